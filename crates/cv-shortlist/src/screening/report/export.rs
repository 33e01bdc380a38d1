//! Spreadsheet serialisation of the shortlist table.
//!
//! The XLSX writer emits a single-sheet SpreadsheetML package: every cell is a shared string, so
//! the package needs no styles part.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::{Cursor, Write};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use mime::Mime;
use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::views::{ReportRow, REPORT_COLUMNS};

pub const EXPORT_FILE_NAME: &str = "cv_shortlist.xlsx";
pub const CSV_FILE_NAME: &str = "cv_shortlist.csv";
/// Content type the download is served with.
pub const LEGACY_EXCEL_MIME: &str = "application/vnd.ms-excel";
pub const SHEET_NAME: &str = "Shortlist";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const RELATIONSHIP_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PACKAGE_RELATIONSHIP_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub const fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => EXPORT_FILE_NAME,
            ExportFormat::Csv => CSV_FILE_NAME,
        }
    }

    pub fn content_type(self) -> Mime {
        match self {
            ExportFormat::Xlsx => LEGACY_EXCEL_MIME
                .parse()
                .unwrap_or(mime::APPLICATION_OCTET_STREAM),
            ExportFormat::Csv => mime::TEXT_CSV_UTF_8,
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "xlsx" | "excel" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown export format '{other}' (expected xlsx or csv)")),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to assemble spreadsheet package: {0}")]
    Package(#[from] zip::result::ZipError),
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to write CSV export: {0}")]
    Csv(#[from] csv::Error),
}

pub(super) fn write_csv(rows: &[ReportRow]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(REPORT_COLUMNS)?;
    for row in rows {
        writer.write_record(row.cells())?;
    }
    writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))
}

pub(super) fn write_xlsx(
    rows: &[ReportRow],
    generated_at: DateTime<Utc>,
) -> Result<Vec<u8>, ExportError> {
    let mut strings = SharedStrings::default();
    let sheet = worksheet_xml(rows, &mut strings);

    let parts = [
        ("[Content_Types].xml", content_types_xml()),
        ("_rels/.rels", package_rels_xml()),
        ("docProps/core.xml", core_properties_xml(generated_at)),
        ("xl/workbook.xml", workbook_xml()),
        ("xl/_rels/workbook.xml.rels", workbook_rels_xml()),
        ("xl/worksheets/sheet1.xml", sheet),
        ("xl/sharedStrings.xml", strings.into_xml()),
    ];

    let mut package = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, xml) in parts {
        package.start_file(name, options)?;
        package.write_all(xml.as_bytes())?;
    }

    Ok(package.finish()?.into_inner())
}

#[derive(Default)]
struct SharedStrings {
    index: HashMap<String, usize>,
    ordered: Vec<String>,
    references: usize,
}

impl SharedStrings {
    fn intern(&mut self, value: &str) -> usize {
        self.references += 1;
        let value = xml_text(value);
        if let Some(position) = self.index.get(&*value) {
            return *position;
        }
        let position = self.ordered.len();
        self.index.insert(value.to_string(), position);
        self.ordered.push(value.into_owned());
        position
    }

    fn into_xml(self) -> String {
        let mut xml = format!(
            r#"{XML_DECLARATION}<sst xmlns="{SPREADSHEET_NS}" count="{}" uniqueCount="{}">"#,
            self.references,
            self.ordered.len()
        );
        for value in &self.ordered {
            let _ = write!(xml, r#"<si><t xml:space="preserve">{}</t></si>"#, escape(value));
        }
        xml.push_str("</sst>");
        xml
    }
}

fn worksheet_xml(rows: &[ReportRow], strings: &mut SharedStrings) -> String {
    let last_row = rows.len() + 1;
    let last_column = column_name(REPORT_COLUMNS.len() - 1);

    let mut xml = format!(
        r#"{XML_DECLARATION}<worksheet xmlns="{SPREADSHEET_NS}"><dimension ref="A1:{last_column}{last_row}"/><sheetData>"#
    );
    append_row(&mut xml, 1, &REPORT_COLUMNS, strings);
    for (offset, row) in rows.iter().enumerate() {
        append_row(&mut xml, offset + 2, &row.cells(), strings);
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

fn append_row(xml: &mut String, row_number: usize, cells: &[&str], strings: &mut SharedStrings) {
    let _ = write!(xml, r#"<row r="{row_number}">"#);
    for (column, value) in cells.iter().enumerate() {
        let position = strings.intern(value);
        let _ = write!(
            xml,
            r#"<c r="{}{row_number}" t="s"><v>{position}</v></c>"#,
            column_name(column)
        );
    }
    xml.push_str("</row>");
}

/// Drops characters XML 1.0 cannot carry (C0 controls other than tab, newline and carriage
/// return, plus U+FFFE and U+FFFF).
fn xml_text(value: &str) -> Cow<'_, str> {
    let allowed = |c: char| match c {
        '\t' | '\n' | '\r' => true,
        '\u{FFFE}' | '\u{FFFF}' => false,
        _ => c >= ' ',
    };
    if value.chars().all(allowed) {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(value.chars().filter(|c| allowed(*c)).collect())
    }
}

/// Spreadsheet column letters for a zero-based index (`0 -> A`, `26 -> AA`).
fn column_name(index: usize) -> String {
    let mut remaining = index + 1;
    let mut letters = Vec::new();
    while remaining > 0 {
        let digit = (remaining - 1) % 26;
        letters.push(char::from(b'A' + digit as u8));
        remaining = (remaining - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn content_types_xml() -> String {
    format!(
        concat!(
            "{}<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">",
            "<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>",
            "<Default Extension=\"xml\" ContentType=\"application/xml\"/>",
            "<Override PartName=\"/xl/workbook.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml\"/>",
            "<Override PartName=\"/xl/worksheets/sheet1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>",
            "<Override PartName=\"/xl/sharedStrings.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml\"/>",
            "<Override PartName=\"/docProps/core.xml\" ContentType=\"application/vnd.openxmlformats-package.core-properties+xml\"/>",
            "</Types>"
        ),
        XML_DECLARATION
    )
}

fn package_rels_xml() -> String {
    format!(
        concat!(
            "{}<Relationships xmlns=\"{}\">",
            "<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"xl/workbook.xml\"/>",
            "<Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties\" Target=\"docProps/core.xml\"/>",
            "</Relationships>"
        ),
        XML_DECLARATION, PACKAGE_RELATIONSHIP_NS
    )
}

fn core_properties_xml(generated_at: DateTime<Utc>) -> String {
    format!(
        concat!(
            "{}<cp:coreProperties xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" ",
            "xmlns:dc=\"http://purl.org/dc/elements/1.1/\" xmlns:dcterms=\"http://purl.org/dc/terms/\" ",
            "xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">",
            "<dc:title>CV Shortlist</dc:title><dc:creator>cv-shortlist</dc:creator>",
            "<dcterms:created xsi:type=\"dcterms:W3CDTF\">{}</dcterms:created>",
            "</cp:coreProperties>"
        ),
        XML_DECLARATION,
        generated_at.format("%Y-%m-%dT%H:%M:%SZ")
    )
}

fn workbook_xml() -> String {
    format!(
        r#"{XML_DECLARATION}<workbook xmlns="{SPREADSHEET_NS}" xmlns:r="{RELATIONSHIP_NS}"><sheets><sheet name="{SHEET_NAME}" sheetId="1" r:id="rId1"/></sheets></workbook>"#
    )
}

fn workbook_rels_xml() -> String {
    format!(
        concat!(
            "{}<Relationships xmlns=\"{}\">",
            "<Relationship Id=\"rId1\" Type=\"{}/worksheet\" Target=\"worksheets/sheet1.xml\"/>",
            "<Relationship Id=\"rId2\" Type=\"{}/sharedStrings\" Target=\"sharedStrings.xml\"/>",
            "</Relationships>"
        ),
        XML_DECLARATION, PACKAGE_RELATIONSHIP_NS, RELATIONSHIP_NS, RELATIONSHIP_NS
    )
}
