mod config;
mod policy;

pub use config::ShortlistCriteria;
pub use policy::{ShortfallReason, ShortlistDecision};

use super::domain::MatchedFields;
use policy::decide_outcome;

/// Stateless evaluator that applies one run's criteria to matched fields.
#[derive(Debug, Clone)]
pub struct ShortlistEvaluator {
    criteria: ShortlistCriteria,
}

impl ShortlistEvaluator {
    pub fn new(criteria: ShortlistCriteria) -> Self {
        Self { criteria }
    }

    pub fn criteria(&self) -> &ShortlistCriteria {
        &self.criteria
    }

    pub fn evaluate(&self, fields: &MatchedFields) -> bool {
        self.decide(fields).is_shortlisted()
    }

    pub fn decide(&self, fields: &MatchedFields) -> ShortlistDecision {
        decide_outcome(fields, &self.criteria)
    }
}
