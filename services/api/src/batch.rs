use crate::infra::{parse_export_format, parse_flag_arg, parse_grade};
use chrono::Local;
use clap::Args;
use cv_shortlist::config::AppConfig;
use cv_shortlist::error::AppError;
use cv_shortlist::screening::report::views::REPORT_COLUMNS;
use cv_shortlist::screening::{
    Document, ExportFormat, Grade, ReportTable, ShortlistCriteria, ShortlistService,
};
use cv_shortlist::telemetry;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ShortlistArgs {
    /// CV files to screen (.pdf, .docx or .doc)
    #[arg(required = true)]
    pub(crate) files: Vec<PathBuf>,
    /// Minimum O/L English grade (defaults to SHORTLIST_MIN_OL_GRADE or C)
    #[arg(long, value_parser = parse_grade)]
    pub(crate) min_ol: Option<Grade>,
    /// Minimum A/L General English grade (defaults to SHORTLIST_MIN_AL_GRADE or C)
    #[arg(long, value_parser = parse_grade)]
    pub(crate) min_al: Option<Grade>,
    /// Only shortlist CVs that mention customer service experience; `=false` turns a
    /// SHORTLIST_REQUIRE_EXPERIENCE default off
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = parse_flag_arg
    )]
    pub(crate) require_experience: Option<bool>,
    /// Write the export here; a directory receives the default file name
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Export format: xlsx or csv
    #[arg(long, default_value = "xlsx", value_parser = parse_export_format)]
    pub(crate) format: ExportFormat,
}

pub(crate) fn run_shortlist(args: ShortlistArgs) -> Result<(), AppError> {
    let ShortlistArgs {
        files,
        min_ol,
        min_al,
        require_experience,
        output,
        format,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let criteria = apply_overrides(config.screening.criteria, min_ol, min_al, require_experience);

    let documents = files
        .iter()
        .map(|path| load_document(path))
        .collect::<Result<Vec<_>, _>>()?;

    let service = ShortlistService::new(criteria, config.screening.skill_keywords.as_slice())?;
    let table = service.run(documents);

    println!(
        "CV shortlist (O/L English <= {}, A/L General English <= {}, experience {})",
        criteria.min_ol_grade,
        criteria.min_al_grade,
        if criteria.require_experience {
            "required"
        } else {
            "optional"
        }
    );
    print!("{}", render_table(&table));
    for record in table.records() {
        if let Some(warning) = record.status.warning() {
            println!("  ! {}: {}", record.file_name, warning);
        }
    }
    println!(
        "{} of {} shortlisted | generated {}",
        table.shortlisted_count(),
        table.len(),
        table
            .generated_at()
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
    );

    if let Some(output) = output {
        let target = export_path(&output, format);
        let bytes = table.serialize(format)?;
        fs::write(&target, &bytes)?;
        info!(path = %target.display(), bytes = bytes.len(), "shortlist exported");
        println!("Saved {}", target.display());
    }

    Ok(())
}

/// Flags given on the command line replace the configured defaults; absent flags keep them.
fn apply_overrides(
    mut criteria: ShortlistCriteria,
    min_ol: Option<Grade>,
    min_al: Option<Grade>,
    require_experience: Option<bool>,
) -> ShortlistCriteria {
    if let Some(grade) = min_ol {
        criteria.min_ol_grade = grade;
    }
    if let Some(grade) = min_al {
        criteria.min_al_grade = grade;
    }
    if let Some(required) = require_experience {
        criteria.require_experience = required;
    }
    criteria
}

fn load_document(path: &Path) -> Result<Document, AppError> {
    let content = fs::read(path)?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Document::new(name, content))
}

fn export_path(output: &Path, format: ExportFormat) -> PathBuf {
    if output.is_dir() {
        output.join(format.file_name())
    } else {
        output.to_path_buf()
    }
}

/// Plain-text table in report column order, padded to the widest cell.
pub(crate) fn render_table(table: &ReportTable) -> String {
    let rows = table.rows();
    let mut widths = REPORT_COLUMNS.map(|column| column.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut rendered = String::new();
    push_line(&mut rendered, &REPORT_COLUMNS, &widths);
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    let rule: Vec<&str> = rule.iter().map(String::as_str).collect();
    push_line(&mut rendered, &rule, &widths);
    for row in &rows {
        push_line(&mut rendered, &row.cells(), &widths);
    }
    rendered
}

fn push_line(out: &mut String, cells: &[&str], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> ReportTable {
        let service = ShortlistService::new(ShortlistCriteria::default(), &["Customer"])
            .expect("service builds");
        service.run(vec![
            Document::new("nimal.doc", Vec::new()),
            Document::new("notes.txt", b"English: A".to_vec()),
        ])
    }

    #[test]
    fn table_lists_header_rule_and_rows() {
        let rendered = render_table(&sample_table());
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Name "));
        assert!(lines[0].ends_with("Shortlisted"));
        assert!(lines[1].starts_with("-----"));
        assert!(lines[2].starts_with("nimal"));
        assert!(lines[2].contains("N/A"));
        assert!(lines[3].starts_with("notes"));
    }

    #[test]
    fn experience_flag_can_switch_configured_requirement_off() {
        let configured = ShortlistCriteria {
            require_experience: true,
            ..ShortlistCriteria::default()
        };

        let kept = apply_overrides(configured, None, None, None);
        assert!(kept.require_experience);

        let relaxed = apply_overrides(configured, None, None, Some(false));
        assert!(!relaxed.require_experience);
        assert_eq!(relaxed.min_ol_grade, configured.min_ol_grade);

        let strict = apply_overrides(ShortlistCriteria::default(), None, None, Some(true));
        assert!(strict.require_experience);
    }

    #[test]
    fn directory_output_uses_default_file_name() {
        let dir = std::env::temp_dir();
        assert_eq!(
            export_path(&dir, ExportFormat::Xlsx),
            dir.join("cv_shortlist.xlsx")
        );
        let file = dir.join("custom-name.xlsx");
        assert_eq!(export_path(&file, ExportFormat::Xlsx), file);
    }

    #[test]
    fn documents_are_named_after_the_file() {
        let path = std::env::temp_dir().join("cv-shortlist-load-test.docx");
        fs::write(&path, b"").expect("write fixture");
        let document = load_document(&path).expect("document loads");
        fs::remove_file(&path).ok();

        assert_eq!(document.name, "cv-shortlist-load-test.docx");
        assert_eq!(document.candidate_name(), "cv-shortlist-load-test");
    }
}
