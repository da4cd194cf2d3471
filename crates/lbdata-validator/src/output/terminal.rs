//! Terminal rendering for batch reports.

use super::report::{BatchReport, FileReport};
use colored::*;

/// Render a human-readable summary of a batch report for the terminal
pub fn render_terminal_summary(report: &BatchReport) -> String {
    let mut out = String::new();

    out.push_str(&render_header(report));
    for file in &report.files {
        out.push_str(&render_file(file));
    }
    out.push_str(&render_status(report));

    out
}

fn render_header(report: &BatchReport) -> String {
    let mut out = String::new();
    out.push_str("\n🔎 ");
    out.push_str(&"LB Data Validation Summary".bold().to_string());
    out.push_str("\n---------------------------------------------------\n");
    out.push_str(&format!("Files checked: {}\n", report.files.len()));
    out.push_str(&format!("Generated:     {}\n", report.generated_at));
    out.push_str("---------------------------------------------------\n\n");
    out
}

fn render_file(file: &FileReport) -> String {
    let symbol = if !file.passed() {
        "❌"
    } else if file.status.is_warning() {
        "⚠️ "
    } else {
        "✅"
    };

    let mut out = format!("{} {}: {}\n", symbol, file.path.display(), file.status);

    if let crate::output::FileStatus::Invalid { diagnostics } = &file.status {
        for diagnostic in diagnostics {
            out.push_str(&format!("     {}\n", diagnostic));
        }
    }
    if let Some(dataset) = &file.dataset {
        out.push_str(&format!("     {}\n", dataset));
    }
    out
}

fn render_status(report: &BatchReport) -> String {
    let mut out = String::new();
    out.push_str("\n---------------------------------------------------\n");
    let status_msg = if report.success() {
        "✅ STATUS: PASSED".green().bold()
    } else {
        format!(
            "❌ STATUS: FAILED ({} of {} file(s))",
            report.failure_count(),
            report.files.len()
        )
        .red()
        .bold()
    };
    out.push_str(&status_msg.to_string());
    out.push('\n');
    out
}
