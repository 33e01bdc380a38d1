use serde::{Deserialize, Serialize};

use crate::screening::domain::{Grade, GradeField};

/// Thresholds applied uniformly to every CV in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortlistCriteria {
    pub min_ol_grade: Grade,
    pub min_al_grade: Grade,
    pub require_experience: bool,
}

impl ShortlistCriteria {
    pub fn minimum_for(&self, field: GradeField) -> Grade {
        match field {
            GradeField::OlEnglish => self.min_ol_grade,
            GradeField::AlGeneralEnglish => self.min_al_grade,
        }
    }
}

impl Default for ShortlistCriteria {
    fn default() -> Self {
        Self {
            min_ol_grade: Grade::DEFAULT_MINIMUM,
            min_al_grade: Grade::DEFAULT_MINIMUM,
            require_experience: false,
        }
    }
}
