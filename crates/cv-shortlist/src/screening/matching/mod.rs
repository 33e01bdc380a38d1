mod patterns;

pub use patterns::{FieldSpec, GRADE_FIELDS, GRADE_WINDOW};

use regex::Regex;

use super::domain::{Grade, GradeField, MatchedFields};

/// Literal, case-sensitive marker for work experience.
pub const EXPERIENCE_KEYWORD: &str = "Experience";
pub const DEFAULT_SKILL_KEYWORDS: [&str; 4] =
    ["Customer", "Communication", "Interpersonal", "Teamwork"];

const DURATION_PATTERN: &str = r"(?i)\b(years|months)\b";

/// Compiled field heuristics applied to each document's text.
#[derive(Debug, Clone)]
pub struct FieldMatcher {
    grades: Vec<(GradeField, Regex)>,
    duration: Regex,
    skills: Option<Regex>,
}

impl FieldMatcher {
    pub fn new<S: AsRef<str>>(skill_keywords: &[S]) -> Result<Self, MatcherError> {
        let grades = GRADE_FIELDS
            .iter()
            .map(|(field, spec)| Ok((*field, Regex::new(&spec.pattern())?)))
            .collect::<Result<Vec<_>, regex::Error>>()?;

        let keywords: Vec<String> = skill_keywords
            .iter()
            .map(|keyword| keyword.as_ref().trim())
            .filter(|keyword| !keyword.is_empty())
            .map(regex::escape)
            .collect();
        let skills = if keywords.is_empty() {
            None
        } else {
            Some(Regex::new(&format!("(?i)({})", keywords.join("|")))?)
        };

        Ok(Self {
            grades,
            duration: Regex::new(DURATION_PATTERN)?,
            skills,
        })
    }

    pub fn standard() -> Result<Self, MatcherError> {
        Self::new(&DEFAULT_SKILL_KEYWORDS)
    }

    pub fn grade(&self, text: &str, field: GradeField) -> Option<Grade> {
        self.grades
            .iter()
            .find(|(candidate, _)| *candidate == field)
            .and_then(|(_, pattern)| first_grade(pattern, text))
    }

    /// True when the text says "Experience" and mentions a duration in years or months
    /// anywhere, not necessarily near each other.
    pub fn has_experience(&self, text: &str) -> bool {
        text.contains(EXPERIENCE_KEYWORD) && self.duration.is_match(text)
    }

    /// Every keyword occurrence in order of appearance, joined with ", ".
    pub fn extract_skills(&self, text: &str) -> String {
        match &self.skills {
            Some(pattern) => pattern
                .find_iter(text)
                .map(|found| found.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            None => String::new(),
        }
    }

    pub fn match_fields(&self, text: &str) -> MatchedFields {
        let mut fields = MatchedFields {
            customer_experience: self.has_experience(text),
            skills: self.extract_skills(text),
            ..MatchedFields::default()
        };
        for field in GradeField::ALL {
            fields.set_grade(field, self.grade(text, field));
        }
        fields
    }
}

/// One-off grade lookup after an arbitrary anchor, using the standard window and grade class.
pub fn find_grade(text: &str, anchor: &str) -> Option<Grade> {
    let pattern = patterns::anchored_pattern(anchor, GRADE_WINDOW, Grade::CAPTURE_CLASS);
    let pattern = Regex::new(&pattern).ok()?;
    first_grade(&pattern, text)
}

fn first_grade(pattern: &Regex, text: &str) -> Option<Grade> {
    let captured = pattern.captures(text)?.get(1)?;
    captured
        .as_str()
        .chars()
        .next()
        .and_then(|code| Grade::new(code).ok())
}

#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    #[error("invalid field pattern: {0}")]
    Pattern(#[from] regex::Error),
}
