//! Converts uploaded CV bytes into plain text.
//!
//! Dispatch happens on the file extension. Unsupported extensions yield empty text rather than
//! an error; malformed PDF or DOCX content is reported as an [`ExtractionError`] so the caller can
//! mark that single file as unprocessable.

mod docx;
mod pdf;

use super::domain::{Document, DocumentFormat};

/// Seam between the pipeline and the document parsers.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, document: &Document) -> Result<String, ExtractionError>;
}

/// Extractor backed by `pdf-extract` for PDFs and the WordprocessingML reader for DOCX.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentTextExtractor;

impl TextExtractor for DocumentTextExtractor {
    fn extract(&self, document: &Document) -> Result<String, ExtractionError> {
        match document.format() {
            DocumentFormat::Pdf => pdf::extract_pdf_text(&document.content),
            DocumentFormat::WordProcessing => docx::extract_docx_text(&document.content),
            DocumentFormat::Unsupported => Ok(String::new()),
        }
    }
}

/// Parser failure for a single document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("unreadable PDF: {0}")]
    Pdf(String),
    #[error("unreadable word-processing document: {0}")]
    WordProcessing(String),
}

#[cfg(test)]
pub(crate) use docx::tests::docx_fixture;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_documents_extract_to_empty_text() {
        let extractor = DocumentTextExtractor;
        for name in ["empty.pdf", "empty.docx", "empty.doc"] {
            let text = extractor
                .extract(&Document::new(name, Vec::new()))
                .expect("empty content is not an error");
            assert_eq!(text, "", "{name} should extract to empty text");
        }
    }

    #[test]
    fn unsupported_extensions_extract_to_empty_text() {
        let extractor = DocumentTextExtractor;
        for name in ["notes.txt", "photo.png", "no_extension"] {
            let text = extractor
                .extract(&Document::new(name, b"English: A".to_vec()))
                .expect("unsupported formats never fail");
            assert!(text.is_empty(), "{name} should be skipped");
        }
    }

    #[test]
    fn malformed_pdf_is_an_error() {
        let extractor = DocumentTextExtractor;
        let result = extractor.extract(&Document::new("broken.pdf", b"not a pdf".to_vec()));
        assert!(matches!(result, Err(ExtractionError::Pdf(_))));
    }

    #[test]
    fn legacy_binary_doc_is_an_error() {
        let extractor = DocumentTextExtractor;
        let result = extractor.extract(&Document::new(
            "legacy.doc",
            vec![0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1],
        ));
        assert!(matches!(result, Err(ExtractionError::WordProcessing(_))));
    }

    #[test]
    fn docx_documents_extract_paragraph_text() {
        let extractor = DocumentTextExtractor;
        let bytes = docx_fixture(&["English: B", "Experience: 2 years"]);
        let text = extractor
            .extract(&Document::new("CV.DOCX", bytes))
            .expect("fixture parses");
        assert_eq!(text, "English: B\nExperience: 2 years\n");
    }
}
