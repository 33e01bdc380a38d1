use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

use super::domain::{Document, Grade, GradeParseError};
use super::evaluation::ShortlistCriteria;
use super::matching::MatcherError;
use super::report::views::ShortlistSummary;
use super::report::{ExportError, ExportFormat, ReportTable};
use super::service::ShortlistService;
use crate::config::{parse_flag, ScreeningConfig};

pub const NO_FILES_MESSAGE: &str = "Upload one or more CV files to process.";

/// Router exposing the shortlist table and its spreadsheet download.
///
/// Both routes take a multipart upload: every part carrying a file name is a CV, and the
/// optional `min_ol`, `min_al`, `require_experience` and `format` text parts override the
/// configured defaults for that request only. Request bodies are capped at
/// `max_upload_bytes`.
pub fn shortlist_router(config: Arc<ScreeningConfig>) -> Router {
    let upload_limit = config.max_upload_bytes;
    Router::new()
        .route("/api/v1/shortlist", post(shortlist_handler))
        .route("/api/v1/shortlist/export", post(export_handler))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(config)
}

#[derive(Debug, Serialize)]
pub struct ShortlistResponse {
    pub criteria: ShortlistCriteria,
    #[serde(flatten)]
    pub summary: ShortlistSummary,
}

pub(crate) async fn shortlist_handler(
    State(config): State<Arc<ScreeningConfig>>,
    multipart: Multipart,
) -> Response {
    let upload = match read_upload(&config, multipart).await {
        Ok(upload) => upload,
        Err(err) => return err.into_response(),
    };
    let criteria = upload.criteria;

    match screen_upload(&config, upload).await {
        Ok(table) => {
            let body = ShortlistResponse {
                criteria,
                summary: table.summary(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn export_handler(
    State(config): State<Arc<ScreeningConfig>>,
    multipart: Multipart,
) -> Response {
    let upload = match read_upload(&config, multipart).await {
        Ok(upload) => upload,
        Err(err) => return err.into_response(),
    };
    let format = upload.format;

    let exported = screen_upload(&config, upload)
        .await
        .and_then(|table| table.serialize(format).map_err(ShortlistRequestError::from));

    match exported {
        Ok(bytes) => {
            info!(format = format.file_name(), bytes = bytes.len(), "shortlist exported");
            let disposition = format!("attachment; filename=\"{}\"", format.file_name());
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, format.content_type().to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response()
        }
        Err(err) => err.into_response(),
    }
}

#[derive(Debug)]
pub(crate) struct ShortlistUpload {
    pub(crate) documents: Vec<Document>,
    pub(crate) criteria: ShortlistCriteria,
    pub(crate) format: ExportFormat,
}

pub(crate) async fn read_upload(
    defaults: &ScreeningConfig,
    mut multipart: Multipart,
) -> Result<ShortlistUpload, ShortlistRequestError> {
    let mut documents = Vec::new();
    let mut criteria = defaults.criteria;
    let mut format = ExportFormat::default();

    while let Some(field) = multipart.next_field().await? {
        let part = field.name().unwrap_or_default().to_string();
        match part.as_str() {
            "min_ol" => criteria.min_ol_grade = parse_grade("min_ol", &field.text().await?)?,
            "min_al" => criteria.min_al_grade = parse_grade("min_al", &field.text().await?)?,
            "require_experience" => {
                let raw = field.text().await?;
                criteria.require_experience =
                    parse_flag(&raw).ok_or(ShortlistRequestError::InvalidFlag {
                        field: "require_experience",
                        value: raw,
                    })?;
            }
            "format" => {
                format = field
                    .text()
                    .await?
                    .parse()
                    .map_err(ShortlistRequestError::InvalidFormat)?;
            }
            _ => {
                let Some(file_name) = field.file_name().map(str::to_owned) else {
                    continue;
                };
                let content = field.bytes().await?;
                documents.push(Document::new(file_name, content.to_vec()));
            }
        }
    }

    if documents.is_empty() {
        return Err(ShortlistRequestError::NoFiles);
    }

    Ok(ShortlistUpload {
        documents,
        criteria,
        format,
    })
}

fn parse_grade(field: &'static str, raw: &str) -> Result<Grade, ShortlistRequestError> {
    raw.parse()
        .map_err(|source| ShortlistRequestError::InvalidGrade { field, source })
}

/// Runs the batch on the blocking pool; parsing is CPU-bound and synchronous.
pub(crate) async fn screen_upload(
    config: &ScreeningConfig,
    upload: ShortlistUpload,
) -> Result<ReportTable, ShortlistRequestError> {
    let skill_keywords = config.skill_keywords.clone();
    let ShortlistUpload {
        documents,
        criteria,
        ..
    } = upload;

    tokio::task::spawn_blocking(move || {
        let service = ShortlistService::new(criteria, skill_keywords.as_slice())?;
        Ok::<_, ShortlistRequestError>(service.run(documents))
    })
    .await?
}

/// Error raised while handling a shortlist request.
#[derive(Debug, thiserror::Error)]
pub enum ShortlistRequestError {
    #[error("{}", NO_FILES_MESSAGE)]
    NoFiles,
    #[error("invalid multipart upload: {0}")]
    Multipart(#[from] MultipartError),
    #[error("invalid {field}: {source}")]
    InvalidGrade {
        field: &'static str,
        source: GradeParseError,
    },
    #[error("invalid {field}: '{value}' is not a yes/no value")]
    InvalidFlag { field: &'static str, value: String },
    #[error("{0}")]
    InvalidFormat(String),
    #[error(transparent)]
    Matcher(#[from] MatcherError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("screening worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl IntoResponse for ShortlistRequestError {
    fn into_response(self) -> Response {
        let status = match &self {
            ShortlistRequestError::Multipart(err) => err.status(),
            ShortlistRequestError::NoFiles
            | ShortlistRequestError::InvalidGrade { .. }
            | ShortlistRequestError::InvalidFlag { .. }
            | ShortlistRequestError::InvalidFormat(_) => StatusCode::BAD_REQUEST,
            ShortlistRequestError::Matcher(_)
            | ShortlistRequestError::Export(_)
            | ShortlistRequestError::Worker(_) => {
                error!(error = %self, "shortlist request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let payload = json!({ "error": self.to_string() });
        (status, Json(payload)).into_response()
    }
}
