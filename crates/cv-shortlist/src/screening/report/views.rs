use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::screening::domain::Grade;
use crate::screening::evaluation::{ShortfallReason, ShortlistDecision};
use crate::screening::record::ScreeningRecord;

pub const REPORT_COLUMNS: [&str; 6] = [
    "Name",
    "O/L English",
    "A/L General English",
    "Customer Exp",
    "Skills",
    "Shortlisted",
];

pub const MISSING_GRADE: &str = "N/A";
pub const SHORTLISTED_MARKER: &str = "✅";
pub const REJECTED_MARKER: &str = "❌";

/// Display form of a record, one string per report column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub name: String,
    pub ol_english: String,
    pub al_general_english: String,
    pub customer_exp: &'static str,
    pub skills: String,
    pub shortlisted: &'static str,
}

impl ReportRow {
    pub fn from_record(record: &ScreeningRecord) -> Self {
        Self {
            name: record.name.clone(),
            ol_english: grade_cell(record.fields.ol_english),
            al_general_english: grade_cell(record.fields.al_general_english),
            customer_exp: if record.fields.customer_experience {
                "Yes"
            } else {
                "No"
            },
            skills: record.fields.skills.clone(),
            shortlisted: if record.is_shortlisted() {
                SHORTLISTED_MARKER
            } else {
                REJECTED_MARKER
            },
        }
    }

    /// Cells in [`REPORT_COLUMNS`] order.
    pub fn cells(&self) -> [&str; 6] {
        [
            self.name.as_str(),
            self.ol_english.as_str(),
            self.al_general_english.as_str(),
            self.customer_exp,
            self.skills.as_str(),
            self.shortlisted,
        ]
    }
}

fn grade_cell(grade: Option<Grade>) -> String {
    grade
        .map(|grade| grade.to_string())
        .unwrap_or_else(|| MISSING_GRADE.to_string())
}

#[derive(Debug, Clone, Serialize)]
pub struct ShortlistRowView {
    #[serde(flatten)]
    pub row: ReportRow,
    pub file_name: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub decision: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shortfalls: Vec<ShortfallReason>,
}

impl ShortlistRowView {
    pub fn from_record(record: &ScreeningRecord) -> Self {
        let shortfalls = match &record.decision {
            ShortlistDecision::Shortlisted => Vec::new(),
            ShortlistDecision::Rejected { reasons } => reasons.clone(),
        };

        Self {
            row: ReportRow::from_record(record),
            file_name: record.file_name.clone(),
            status: record.status.label(),
            warning: record.status.warning(),
            decision: record.decision.summary(),
            shortfalls,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShortlistSummary {
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    pub shortlisted: usize,
    pub unprocessable: usize,
    pub rows: Vec<ShortlistRowView>,
}
