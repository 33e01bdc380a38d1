use std::panic::{self, AssertUnwindSafe};

use tracing::debug;

use super::ExtractionError;

/// Text of every page in document order.
///
/// `pdf-extract` panics on some malformed inputs; those panics are contained here and reported
/// as an ordinary per-file error.
pub(super) fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    if bytes.is_empty() {
        return Ok(String::new());
    }

    match panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(bytes)
    })) {
        Ok(Ok(text)) => {
            debug!(bytes = bytes.len(), chars = text.len(), "extracted pdf text");
            Ok(text)
        }
        Ok(Err(err)) => Err(ExtractionError::Pdf(err.to_string())),
        Err(_) => Err(ExtractionError::Pdf(
            "parser aborted on malformed content".to_string(),
        )),
    }
}
