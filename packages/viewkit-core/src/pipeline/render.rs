//! Report rendering (text and JSON)

use super::orchestrator::LintMode;
use super::result::LintReport;
use std::fmt::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Human-readable enumeration of failing files plus a summary line.
/// Paths under `base` are shown relative to it.
pub fn render_text(report: &LintReport, mode: LintMode, base: Option<&Path>) -> String {
    let mut out = String::new();
    for file in report.failing_files() {
        let shown = base
            .and_then(|b| file.path.strip_prefix(b).ok())
            .unwrap_or(file.path.as_path());
        let _ = writeln!(out, "\n✗ {}", shown.display());
        for finding in &file.findings {
            let _ = writeln!(out, "  - {}", finding);
        }
    }

    let verb = match mode {
        LintMode::Views => "Validation",
        LintMode::Basic => "Linting",
    };
    if report.passed() {
        let _ = writeln!(
            out,
            "\n✓ {} finished. No errors found in {} files.",
            verb,
            report.files_checked()
        );
    } else {
        let _ = writeln!(
            out,
            "\n{} finished with {} errors in {} files.",
            verb,
            report.total_findings(),
            report.files_with_findings()
        );
    }
    out
}

pub fn render_json(report: &LintReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
