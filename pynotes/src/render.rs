//! Plain-text rendering for CLI output

use console::Style;
use pynoteslib::{BatchReport, FileReport, Statistics, StripReport};
use std::fmt::Write;
use std::path::Path;

const RULE_WIDTH: usize = 80;

fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

fn header() -> Style {
    Style::new().bold()
}

/// Escape control characters and backslashes so each entry stays on one row
pub fn escape(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

/// Convert a path to a relative path from the base directory
pub fn make_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .ok()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

fn statistics_lines(out: &mut String, stats: &Statistics) {
    let _ = writeln!(
        out,
        "Comment lines: {:<8} Total lines: {:<8} Line ratio: {:.0}%",
        stats.comment_line_count, stats.total_line_count, stats.comment_line_ratio
    );
    let _ = writeln!(
        out,
        "Comment letters: {:<6} Total letters: {:<6} Letter ratio: {:.0}%",
        stats.comment_letter_count, stats.total_letter_count, stats.comment_letter_ratio
    );
}

/// Render the commentary table and statistics of one file
pub fn file_report(report: &FileReport, name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", header().apply_to(name));
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "{}", header().apply_to(format!("{:<8}{}", "Line", "Content")));
    for comment in &report.comments {
        let _ = writeln!(out, "{:<8}{}", comment.line, escape(&comment.content));
    }
    let _ = writeln!(out, "{}", rule());
    statistics_lines(&mut out, &report.statistics());
    out
}

/// Render every file of a directory analysis followed by the totals
pub fn batch_report(batch: &BatchReport<FileReport>, base: &Path) -> String {
    let mut out = String::new();
    for report in &batch.files {
        out.push_str(&file_report(report, &make_relative(&report.path, base)));
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "{}",
        header().apply_to(format!("Total ({} files)", batch.files.len()))
    );
    let _ = writeln!(out, "{}", rule());
    statistics_lines(&mut out, &batch.totals());
    out
}

fn strip_line(out: &mut String, report: &StripReport, name: &str) {
    let _ = writeln!(
        out,
        "{name}: removed {} of {} lines (backup: {})",
        report.removed,
        report.total,
        report.backup.display()
    );
}

/// Render the summary of one stripped file
pub fn strip_report(report: &StripReport, name: &str) -> String {
    let mut out = String::new();
    strip_line(&mut out, report, name);
    out
}

/// Render the summary of a stripped directory
pub fn strip_batch(batch: &BatchReport<StripReport>, base: &Path) -> String {
    let mut out = String::new();
    for report in &batch.files {
        strip_line(&mut out, report, &make_relative(&report.path, base));
    }
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(
        out,
        "{}",
        header().apply_to(format!(
            "Removed {} lines in {} files",
            batch.removed(),
            batch.files.len()
        ))
    );
    out
}
