use serde::Serialize;

use super::domain::{DocumentFormat, MatchedFields};
use super::evaluation::ShortlistDecision;

/// How far a file got through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordStatus {
    Screened,
    /// Extension not recognised; screened against empty text.
    UnsupportedFormat,
    /// Parser rejected the content; no fields could be matched.
    Unprocessable { reason: String },
}

impl RecordStatus {
    pub const fn label(&self) -> &'static str {
        match self {
            RecordStatus::Screened => "screened",
            RecordStatus::UnsupportedFormat => "unsupported_format",
            RecordStatus::Unprocessable { .. } => "unprocessable",
        }
    }

    pub fn warning(&self) -> Option<String> {
        match self {
            RecordStatus::Screened => None,
            RecordStatus::UnsupportedFormat => {
                Some("unsupported file type; expected .pdf, .docx or .doc".to_string())
            }
            RecordStatus::Unprocessable { reason } => Some(format!("could not be read: {reason}")),
        }
    }
}

/// One shortlist row per uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreeningRecord {
    pub name: String,
    pub file_name: String,
    pub format: DocumentFormat,
    pub status: RecordStatus,
    pub fields: MatchedFields,
    pub decision: ShortlistDecision,
}

impl ScreeningRecord {
    pub fn is_shortlisted(&self) -> bool {
        self.decision.is_shortlisted()
    }

    pub fn is_unprocessable(&self) -> bool {
        matches!(self.status, RecordStatus::Unprocessable { .. })
    }
}
