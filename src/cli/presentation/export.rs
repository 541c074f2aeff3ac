//! Export presentation.

use crate::export::{ExportReport, ExportStatus};
use owo_colors::OwoColorize;

/// `ExportReport::summary` with the status coloured by outcome.
pub fn format_export_summary(report: &ExportReport, target: &str) -> String {
    let summary = report.summary(target);
    let status = report.status.to_string();
    let coloured = match report.status {
        ExportStatus::Success => status.green().to_string(),
        ExportStatus::SafeMode => status.yellow().to_string(),
    };
    match summary.strip_suffix(&format!("[{}]", status)) {
        Some(prefix) => format!("{}[{}]", prefix, coloured),
        None => summary,
    }
}
