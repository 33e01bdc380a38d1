//! CV screening: text extraction, field matching, shortlisting and the exportable report.
//!
//! Each uploaded file is processed independently. A file the parsers cannot read becomes an
//! "unprocessable" row instead of failing the batch.

pub mod domain;
pub mod evaluation;
pub mod extract;
pub mod matching;
pub mod record;
pub mod report;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Document, DocumentFormat, Grade, GradeField, GradeParseError, MatchedFields,
};
pub use evaluation::{ShortfallReason, ShortlistCriteria, ShortlistDecision, ShortlistEvaluator};
pub use extract::{DocumentTextExtractor, ExtractionError, TextExtractor};
pub use matching::{find_grade, FieldMatcher, FieldSpec, MatcherError, DEFAULT_SKILL_KEYWORDS};
pub use record::{RecordStatus, ScreeningRecord};
pub use report::{ExportError, ExportFormat, ReportTable};
pub use router::{shortlist_router, ShortlistRequestError, ShortlistResponse};
pub use service::ShortlistService;
