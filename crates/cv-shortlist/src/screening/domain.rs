use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Uploaded CV as handed over by the host surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub content: Vec<u8>,
}

impl Document {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn format(&self) -> DocumentFormat {
        DocumentFormat::from_file_name(&self.name)
    }

    /// Name shown in the shortlist: the file name up to its first `.`.
    pub fn candidate_name(&self) -> &str {
        self.name.split('.').next().unwrap_or(&self.name)
    }
}

/// Formats the extractor knows how to read, inferred from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    WordProcessing,
    Unsupported,
}

impl DocumentFormat {
    pub fn from_file_name(name: &str) -> Self {
        let lowered = name.to_ascii_lowercase();
        if lowered.ends_with(".pdf") {
            Self::Pdf
        } else if lowered.ends_with(".docx") || lowered.ends_with(".doc") {
            Self::WordProcessing
        } else {
            Self::Unsupported
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::WordProcessing => "docx",
            DocumentFormat::Unsupported => "unsupported",
        }
    }
}

/// Single-character exam grade code.
///
/// Codes compare by character, so digits sort before letters and `A < B < ... < E`.
/// A grade "meets" a minimum when it sorts at or before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Grade(char);

impl Grade {
    /// Character class accepted by the grade matcher.
    pub const CAPTURE_CLASS: &'static str = "[A-E1-9]";
    pub const DEFAULT_MINIMUM: Grade = Grade('C');

    pub fn new(code: char) -> Result<Self, GradeParseError> {
        let upper = code.to_ascii_uppercase();
        match upper {
            'A'..='E' | '1'..='9' => Ok(Self(upper)),
            _ => Err(GradeParseError::Unknown(code.to_string())),
        }
    }

    pub const fn code(self) -> char {
        self.0
    }

    pub fn meets(self, minimum: Grade) -> bool {
        self <= minimum
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Grade {
    type Err = GradeParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Err(GradeParseError::Empty),
            (Some(code), None) => Self::new(code),
            (Some(_), Some(_)) => Err(GradeParseError::Unknown(trimmed.to_string())),
        }
    }
}

impl TryFrom<String> for Grade {
    type Error = GradeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Grade> for String {
    fn from(grade: Grade) -> Self {
        grade.0.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GradeParseError {
    #[error("grade code is empty")]
    Empty,
    #[error("'{0}' is not a grade code (expected one of A-E or 1-9)")]
    Unknown(String),
}

/// Grade columns the shortlist tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeField {
    OlEnglish,
    AlGeneralEnglish,
}

impl GradeField {
    pub const ALL: [GradeField; 2] = [GradeField::OlEnglish, GradeField::AlGeneralEnglish];

    pub const fn label(self) -> &'static str {
        match self {
            GradeField::OlEnglish => "O/L English",
            GradeField::AlGeneralEnglish => "A/L General English",
        }
    }
}

/// Everything the matcher pulled out of one document's text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchedFields {
    pub ol_english: Option<Grade>,
    pub al_general_english: Option<Grade>,
    pub customer_experience: bool,
    /// Matched skill keywords joined with ", ", in order of appearance.
    pub skills: String,
}

impl MatchedFields {
    pub fn grade(&self, field: GradeField) -> Option<Grade> {
        match field {
            GradeField::OlEnglish => self.ol_english,
            GradeField::AlGeneralEnglish => self.al_general_english,
        }
    }

    pub fn set_grade(&mut self, field: GradeField, grade: Option<Grade>) {
        match field {
            GradeField::OlEnglish => self.ol_english = grade,
            GradeField::AlGeneralEnglish => self.al_general_english = grade,
        }
    }
}
