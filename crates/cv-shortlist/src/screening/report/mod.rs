mod export;
pub mod views;

pub use export::{
    ExportError, ExportFormat, CSV_FILE_NAME, EXPORT_FILE_NAME, LEGACY_EXCEL_MIME, SHEET_NAME,
};

use chrono::{DateTime, Utc};

use super::record::ScreeningRecord;
use views::{ReportRow, ShortlistRowView, ShortlistSummary};

/// Shortlist rows for one run, in upload order.
#[derive(Debug, Clone)]
pub struct ReportTable {
    generated_at: DateTime<Utc>,
    records: Vec<ScreeningRecord>,
}

impl ReportTable {
    pub fn build(records: Vec<ScreeningRecord>) -> Self {
        Self {
            generated_at: Utc::now(),
            records,
        }
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn records(&self) -> &[ScreeningRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn shortlisted_count(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.is_shortlisted())
            .count()
    }

    pub fn unprocessable_count(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.is_unprocessable())
            .count()
    }

    pub fn rows(&self) -> Vec<ReportRow> {
        self.records.iter().map(ReportRow::from_record).collect()
    }

    pub fn summary(&self) -> ShortlistSummary {
        ShortlistSummary {
            generated_at: self.generated_at,
            total: self.len(),
            shortlisted: self.shortlisted_count(),
            unprocessable: self.unprocessable_count(),
            rows: self
                .records
                .iter()
                .map(ShortlistRowView::from_record)
                .collect(),
        }
    }

    pub fn serialize(&self, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
        match format {
            ExportFormat::Xlsx => self.to_xlsx(),
            ExportFormat::Csv => self.to_csv(),
        }
    }

    pub fn to_xlsx(&self) -> Result<Vec<u8>, ExportError> {
        export::write_xlsx(&self.rows(), self.generated_at)
    }

    pub fn to_csv(&self) -> Result<Vec<u8>, ExportError> {
        export::write_csv(&self.rows())
    }
}
