use tracing::{debug, info, warn};

use super::domain::{Document, DocumentFormat, MatchedFields};
use super::evaluation::{ShortlistCriteria, ShortlistEvaluator};
use super::extract::{DocumentTextExtractor, TextExtractor};
use super::matching::{FieldMatcher, MatcherError};
use super::record::{RecordStatus, ScreeningRecord};
use super::report::ReportTable;
use crate::config::ScreeningConfig;

/// Pipeline composing extraction, field matching and the shortlist evaluator.
pub struct ShortlistService<E = DocumentTextExtractor> {
    extractor: E,
    matcher: FieldMatcher,
    evaluator: ShortlistEvaluator,
}

impl ShortlistService<DocumentTextExtractor> {
    pub fn new<S: AsRef<str>>(
        criteria: ShortlistCriteria,
        skill_keywords: &[S],
    ) -> Result<Self, MatcherError> {
        Self::with_extractor(DocumentTextExtractor, criteria, skill_keywords)
    }

    pub fn from_config(config: &ScreeningConfig) -> Result<Self, MatcherError> {
        Self::new(config.criteria, config.skill_keywords.as_slice())
    }
}

impl<E: TextExtractor> ShortlistService<E> {
    pub fn with_extractor<S: AsRef<str>>(
        extractor: E,
        criteria: ShortlistCriteria,
        skill_keywords: &[S],
    ) -> Result<Self, MatcherError> {
        Ok(Self {
            extractor,
            matcher: FieldMatcher::new(skill_keywords)?,
            evaluator: ShortlistEvaluator::new(criteria),
        })
    }

    pub fn criteria(&self) -> &ShortlistCriteria {
        self.evaluator.criteria()
    }

    /// Screen a single document. Extraction failures are recorded on the row, never raised.
    pub fn screen(&self, document: &Document) -> ScreeningRecord {
        let format = document.format();
        let (status, fields) = match self.extractor.extract(document) {
            Ok(text) => {
                debug!(file = %document.name, chars = text.len(), "matching fields");
                let status = if format == DocumentFormat::Unsupported {
                    warn!(file = %document.name, "unsupported file type, screening empty text");
                    RecordStatus::UnsupportedFormat
                } else {
                    RecordStatus::Screened
                };
                (status, self.matcher.match_fields(&text))
            }
            Err(err) => {
                warn!(file = %document.name, error = %err, "file is unprocessable");
                let status = RecordStatus::Unprocessable {
                    reason: err.to_string(),
                };
                (status, MatchedFields::default())
            }
        };

        let decision = self.evaluator.decide(&fields);
        ScreeningRecord {
            name: document.candidate_name().to_string(),
            file_name: document.name.clone(),
            format,
            status,
            fields,
            decision,
        }
    }

    /// Screen a batch in upload order.
    pub fn run<I>(&self, documents: I) -> ReportTable
    where
        I: IntoIterator<Item = Document>,
    {
        let records: Vec<ScreeningRecord> = documents
            .into_iter()
            .map(|document| self.screen(&document))
            .collect();
        let table = ReportTable::build(records);

        info!(
            files = table.len(),
            shortlisted = table.shortlisted_count(),
            unprocessable = table.unprocessable_count(),
            "shortlist run complete"
        );
        table
    }
}
