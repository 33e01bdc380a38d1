use crate::screening::domain::{Grade, GradeField};

/// Characters scanned after an anchor before giving up on a grade.
pub const GRADE_WINDOW: usize = 20;

/// Declarative description of a value found shortly after an anchor keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub label: &'static str,
    pub anchor: &'static str,
    pub window: usize,
    pub capture_class: &'static str,
}

impl FieldSpec {
    pub const fn grade(label: &'static str, anchor: &'static str) -> Self {
        Self {
            label,
            anchor,
            window: GRADE_WINDOW,
            capture_class: Grade::CAPTURE_CLASS,
        }
    }

    pub fn pattern(&self) -> String {
        anchored_pattern(self.anchor, self.window, self.capture_class)
    }
}

/// Grade anchors, in column order.
///
/// "English" also occurs inside "General English", so the O/L pattern can land on the A/L line
/// when a CV has no standalone O/L entry.
pub const GRADE_FIELDS: [(GradeField, FieldSpec); 2] = [
    (
        GradeField::OlEnglish,
        FieldSpec::grade(GradeField::OlEnglish.label(), "English"),
    ),
    (
        GradeField::AlGeneralEnglish,
        FieldSpec::grade(GradeField::AlGeneralEnglish.label(), "General English"),
    ),
];

/// Case-insensitive anchor, then up to `window` non-newline characters, then a character of
/// `capture_class`. The window is greedy: the last class character in reach is captured.
pub(crate) fn anchored_pattern(anchor: &str, window: usize, capture_class: &str) -> String {
    format!(
        "(?i){}.{{0,{window}}}({capture_class})",
        regex::escape(anchor)
    )
}
