//! Plain-text reader for WordprocessingML (`.docx`) packages.
//!
//! A DOCX file is a ZIP archive; the body lives in `word/document.xml` with optional
//! `word/header*.xml` and `word/footer*.xml` parts. Text is emitted headers first, then the
//! body, then footers. Paragraph ends and breaks become newlines, tabs become `\t`.

use std::io::{Cursor, Read, Seek};

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

use super::ExtractionError;

const BODY_PART: &str = "word/document.xml";

pub(super) fn extract_docx_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    if bytes.is_empty() {
        return Ok(String::new());
    }

    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|err| ExtractionError::WordProcessing(format!("not a DOCX package: {err}")))?;

    let body = read_part(&mut archive, BODY_PART)?.ok_or_else(|| {
        ExtractionError::WordProcessing(format!("package has no {BODY_PART}"))
    })?;
    let (headers, footers) = margin_parts(&archive);

    let mut text = String::new();
    for name in &headers {
        if let Some(xml) = read_part(&mut archive, name)? {
            text.push_str(&part_text(name, &xml)?);
        }
    }
    text.push_str(&part_text(BODY_PART, &body)?);
    for name in &footers {
        if let Some(xml) = read_part(&mut archive, name)? {
            text.push_str(&part_text(name, &xml)?);
        }
    }

    debug!(
        headers = headers.len(),
        footers = footers.len(),
        chars = text.len(),
        "extracted docx text"
    );
    Ok(text)
}

fn margin_parts<R: Read + Seek>(archive: &ZipArchive<R>) -> (Vec<String>, Vec<String>) {
    let mut headers = Vec::new();
    let mut footers = Vec::new();

    for name in archive.file_names() {
        if !name.ends_with(".xml") {
            continue;
        }
        if name.starts_with("word/header") {
            headers.push(name.to_string());
        } else if name.starts_with("word/footer") {
            footers.push(name.to_string());
        }
    }

    headers.sort_by_cached_key(|name| (part_number(name), name.clone()));
    footers.sort_by_cached_key(|name| (part_number(name), name.clone()));
    (headers, footers)
}

/// Numeric suffix of a part such as `word/header10.xml`; unnumbered parts sort first.
fn part_number(name: &str) -> u32 {
    let stem = name.rsplit('/').next().unwrap_or(name);
    let digits: String = stem
        .trim_end_matches(".xml")
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, ExtractionError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(err) => {
            return Err(ExtractionError::WordProcessing(format!(
                "failed to open {name}: {err}"
            )))
        }
    };

    let mut xml = String::new();
    file.read_to_string(&mut xml)
        .map_err(|err| ExtractionError::WordProcessing(format!("failed to read {name}: {err}")))?;
    Ok(Some(xml))
}

fn part_text(name: &str, xml: &str) -> Result<String, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) if element.local_name().as_ref() == b"t" => in_text = true,
            Ok(Event::End(element)) => match element.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(element)) => match element.local_name().as_ref() {
                b"tab" => text.push('\t'),
                b"br" | b"cr" | b"p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(chunk)) if in_text => {
                let unescaped = chunk.unescape().map_err(|err| {
                    ExtractionError::WordProcessing(format!("bad text in {name}: {err}"))
                })?;
                text.push_str(&unescaped);
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(ExtractionError::WordProcessing(format!(
                    "malformed XML in {name} at byte {}: {err}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    Ok(text)
}
