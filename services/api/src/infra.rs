use cv_shortlist::screening::{ExportFormat, Grade};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_grade(raw: &str) -> Result<Grade, String> {
    raw.parse()
        .map_err(|err| format!("failed to parse '{raw}' as a grade ({err})"))
}

pub(crate) fn parse_flag_arg(raw: &str) -> Result<bool, String> {
    cv_shortlist::config::parse_flag(raw)
        .ok_or_else(|| format!("expected true or false, got '{raw}'"))
}

pub(crate) fn parse_export_format(raw: &str) -> Result<ExportFormat, String> {
    raw.parse()
}
