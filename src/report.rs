// src/report.rs
//! Report rendering: terminal, markdown, and JSON views of a scan.

use std::fmt::Write as _;

use colored::Colorize;

use crate::error::Result;
use crate::types::{FileReport, Issue, ScanReport, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Markdown,
    Json,
}

/// Renders `report` in the requested format.
///
/// # Errors
///
/// Only JSON rendering can fail, and only on serializer errors.
pub fn render(report: &ScanReport, format: Format) -> Result<String> {
    match format {
        Format::Text => Ok(render_text(report)),
        Format::Markdown => Ok(render_markdown(report)),
        Format::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

fn render_text(report: &ScanReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} files, {} issues ({} ms)",
        "srcvet:".bold(),
        report.files.len(),
        report.total_issues,
        report.duration_ms
    );

    for file in &report.files {
        let _ = writeln!(
            out,
            "\n{} ({})",
            file.path.display().to_string().cyan().bold(),
            file.language
        );
        let _ = writeln!(out, "  {}", metrics_line(file));
        for issue in &file.result.issues {
            let _ = writeln!(out, "  {}", issue_line(issue));
        }
    }
    out
}

fn metrics_line(file: &FileReport) -> String {
    let m = &file.result.metrics;
    if m.is_degraded() {
        return "unparseable".red().to_string();
    }
    format!(
        "cyclomatic {}  cognitive {}  maintainability {:.1}  loc {}  comments {:.0}%",
        m.cyclomatic_complexity,
        m.cognitive_complexity,
        m.maintainability_index,
        m.lines_of_code,
        m.comment_ratio * 100.0
    )
}

fn issue_line(issue: &Issue) -> String {
    let severity = match issue.severity {
        Severity::Error => format!("[{}]", issue.severity).red().bold(),
        Severity::High => format!("[{}]", issue.severity).red(),
        Severity::Medium => format!("[{}]", issue.severity).yellow(),
        Severity::Low => format!("[{}]", issue.severity).normal(),
    };
    match issue.line {
        Some(line) => format!("{severity} line {line}: {}", issue.message),
        None => format!("{severity} {}", issue.message),
    }
}

fn render_markdown(report: &ScanReport) -> String {
    let mut out = String::from("# Code Review Report\n\n");

    let _ = writeln!(out, "## Summary\n");
    let _ = writeln!(out, "- Files analyzed: {}", report.files.len());
    let _ = writeln!(out, "- Clean files: {}", report.clean_file_count());
    let _ = writeln!(out, "- Total issues: {}\n", report.total_issues);

    for file in &report.files {
        let _ = writeln!(out, "## {}\n", file.path.display());

        let m = &file.result.metrics;
        let _ = writeln!(out, "### Metrics\n");
        out.push_str("```\n");
        let _ = writeln!(out, "cyclomatic_complexity: {}", m.cyclomatic_complexity);
        let _ = writeln!(out, "maintainability_index: {:.2}", m.maintainability_index);
        let _ = writeln!(out, "cognitive_complexity: {}", m.cognitive_complexity);
        let _ = writeln!(out, "lines_of_code: {}", m.lines_of_code);
        let _ = writeln!(out, "comment_ratio: {:.2}", m.comment_ratio);
        out.push_str("```\n\n");

        if !file.result.issues.is_empty() {
            let _ = writeln!(out, "### Issues\n");
            for issue in &file.result.issues {
                let line = issue
                    .line
                    .map_or_else(|| "N/A".to_string(), |l| l.to_string());
                let _ = writeln!(
                    out,
                    "- [{}] Line {line}: {}",
                    issue.severity, issue.message
                );
            }
            out.push('\n');
        }
    }
    out
}
