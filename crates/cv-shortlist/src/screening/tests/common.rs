use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use calamine::{open_workbook_from_rs, Reader, Xlsx};
use serde_json::Value;

use crate::config::ScreeningConfig;
use crate::screening::domain::{Document, Grade, MatchedFields};
use crate::screening::evaluation::{ShortlistCriteria, ShortlistEvaluator};
use crate::screening::extract::{docx_fixture, ExtractionError, TextExtractor};
use crate::screening::matching::DEFAULT_SKILL_KEYWORDS;
use crate::screening::report::SHEET_NAME;
use crate::screening::{shortlist_router, ShortlistService};

pub(super) const BOUNDARY: &str = "cv-shortlist-boundary";

pub(super) fn grade(code: char) -> Grade {
    Grade::new(code).expect("valid grade")
}

pub(super) fn criteria(min_ol: char, min_al: char, require_experience: bool) -> ShortlistCriteria {
    ShortlistCriteria {
        min_ol_grade: grade(min_ol),
        min_al_grade: grade(min_al),
        require_experience,
    }
}

pub(super) fn evaluator(min_ol: char, min_al: char, require_experience: bool) -> ShortlistEvaluator {
    ShortlistEvaluator::new(criteria(min_ol, min_al, require_experience))
}

pub(super) fn fields(ol: Option<char>, al: Option<char>, experience: bool) -> MatchedFields {
    MatchedFields {
        ol_english: ol.map(grade),
        al_general_english: al.map(grade),
        customer_experience: experience,
        skills: String::new(),
    }
}

/// Text a strong candidate's CV reduces to.
pub(super) const STRONG_CV: &str =
    "English: A\nGeneral English: B\nExperience 2 years\nCustomer focus";
pub(super) const UNGRADED_CV: &str = "Hobbies: chess, hiking. Teamwork matters.";

/// Extractor returning canned text per file name.
#[derive(Default)]
pub(super) struct CannedExtractor {
    texts: HashMap<String, Result<String, ExtractionError>>,
}

impl CannedExtractor {
    pub(super) fn with_text(mut self, file_name: &str, text: &str) -> Self {
        self.texts
            .insert(file_name.to_string(), Ok(text.to_string()));
        self
    }

    pub(super) fn with_failure(mut self, file_name: &str, reason: &str) -> Self {
        self.texts.insert(
            file_name.to_string(),
            Err(ExtractionError::Pdf(reason.to_string())),
        );
        self
    }
}

impl TextExtractor for CannedExtractor {
    fn extract(&self, document: &Document) -> Result<String, ExtractionError> {
        self.texts
            .get(&document.name)
            .cloned()
            .unwrap_or_else(|| Ok(String::new()))
    }
}

pub(super) fn canned_service(
    extractor: CannedExtractor,
    criteria: ShortlistCriteria,
) -> ShortlistService<CannedExtractor> {
    ShortlistService::with_extractor(extractor, criteria, &DEFAULT_SKILL_KEYWORDS)
        .expect("default skills compile")
}

pub(super) fn empty_document(name: &str) -> Document {
    Document::new(name, Vec::new())
}

pub(super) fn docx_document(name: &str, paragraphs: &[&str]) -> Document {
    Document::new(name, docx_fixture(paragraphs))
}

pub(super) fn router() -> Router {
    shortlist_router(Arc::new(ScreeningConfig::default()))
}

/// One part of a hand-built `multipart/form-data` body.
pub(super) enum UploadPart<'a> {
    File { name: &'a str, content: Vec<u8> },
    Text { field: &'a str, value: &'a str },
}

pub(super) fn multipart_request(uri: &str, parts: Vec<UploadPart<'_>>) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            UploadPart::File { name, content } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"files\"; filename=\"{name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(&content);
            }
            UploadPart::Text { field, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{field}\"\r\n\r\n{value}")
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::post(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request builds")
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    serde_json::from_slice(&read_body(response).await).expect("json payload")
}

/// Every row of the shortlist sheet, header first, as display strings.
pub(super) fn sheet_rows(bytes: Vec<u8>) -> Vec<Vec<String>> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).expect("valid xlsx");
    let range = workbook
        .worksheet_range(SHEET_NAME)
        .expect("shortlist sheet present");
    range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}
