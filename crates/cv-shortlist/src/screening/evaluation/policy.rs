use serde::Serialize;

use super::config::ShortlistCriteria;
use crate::screening::domain::{Grade, GradeField, MatchedFields};

/// Outcome of applying the criteria to one CV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum ShortlistDecision {
    Shortlisted,
    Rejected { reasons: Vec<ShortfallReason> },
}

impl ShortlistDecision {
    pub fn is_shortlisted(&self) -> bool {
        matches!(self, ShortlistDecision::Shortlisted)
    }

    pub fn summary(&self) -> String {
        match self {
            ShortlistDecision::Shortlisted => "shortlisted".to_string(),
            ShortlistDecision::Rejected { reasons } => {
                let details: Vec<String> = reasons.iter().map(ShortfallReason::summary).collect();
                format!("not shortlisted: {}", details.join("; "))
            }
        }
    }
}

/// Individual criterion a CV failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShortfallReason {
    MissingGrade {
        field: GradeField,
    },
    GradeBelowMinimum {
        field: GradeField,
        grade: Grade,
        minimum: Grade,
    },
    ExperienceRequired,
}

impl ShortfallReason {
    pub fn summary(&self) -> String {
        match self {
            ShortfallReason::MissingGrade { field } => format!("no {} grade found", field.label()),
            ShortfallReason::GradeBelowMinimum {
                field,
                grade,
                minimum,
            } => format!("{} grade {grade} is below minimum {minimum}", field.label()),
            ShortfallReason::ExperienceRequired => "customer service experience required".to_string(),
        }
    }
}

pub(crate) fn decide_outcome(
    fields: &MatchedFields,
    criteria: &ShortlistCriteria,
) -> ShortlistDecision {
    let mut reasons = Vec::new();

    for field in GradeField::ALL {
        let minimum = criteria.minimum_for(field);
        match fields.grade(field) {
            Some(grade) if grade.meets(minimum) => {}
            Some(grade) => reasons.push(ShortfallReason::GradeBelowMinimum {
                field,
                grade,
                minimum,
            }),
            None => reasons.push(ShortfallReason::MissingGrade { field }),
        }
    }

    if criteria.require_experience && !fields.customer_experience {
        reasons.push(ShortfallReason::ExperienceRequired);
    }

    if reasons.is_empty() {
        ShortlistDecision::Shortlisted
    } else {
        ShortlistDecision::Rejected { reasons }
    }
}
