use std::fmt::Write;
use std::str::FromStr;

use unicode_width::UnicodeWidthStr;

use crate::scanner::{FileReport, Finding};

/// Format styles supported by the default reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    List,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "list" => Ok(Self::List),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "invalid output format `{other}` (expected table, list, or json)"
            )),
        }
    }
}

const NO_ISSUES: &str = "No accessibility issues found.";

// Upper bounds on column content width, mirroring the report columns
// `#`, Title, Type, Severity, Line(s), Description, Suggestion. The
// index column is never wrapped.
const HEADERS: [&str; 7] = [
    "#",
    "Issue Title",
    "Issue Type",
    "Severity",
    "Line(s)",
    "Description",
    "Suggestion",
];
const MAX_WIDTHS: [usize; 7] = [usize::MAX, 25, 10, 10, 10, 40, 40];

/// Produce a report string for one scanned file in the desired format.
/// Rendering has no failure modes tied to content; an empty finding
/// list renders as a positive message in the human formats.
pub fn render_report(report: &FileReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Table => render_table(report),
        OutputFormat::List => render_list(report),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

fn finding_row(index: usize, finding: &Finding) -> [String; 7] {
    let lines = finding
        .line_numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    [
        (index + 1).to_string(),
        finding.title.clone(),
        finding.issue_type.clone(),
        finding.severity.to_string(),
        lines,
        finding.description.clone(),
        finding.suggestion.clone(),
    ]
}

fn render_table(report: &FileReport) -> anyhow::Result<String> {
    if report.findings.is_empty() {
        return Ok(format!("{NO_ISSUES}\n"));
    }

    let rows: Vec<[String; 7]> = report
        .findings
        .iter()
        .enumerate()
        .map(|(idx, finding)| finding_row(idx, finding))
        .collect();

    // Wrap every cell first, then size each column to its widest
    // wrapped line so short tables stay narrow.
    let header_cells: Vec<Vec<String>> = HEADERS
        .iter()
        .zip(MAX_WIDTHS)
        .map(|(header, max)| wrap_text(header, max))
        .collect();
    let wrapped_rows: Vec<Vec<Vec<String>>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .zip(MAX_WIDTHS)
                .map(|(cell, max)| wrap_text(cell, max))
                .collect()
        })
        .collect();

    let mut widths = vec![0usize; HEADERS.len()];
    for cells in std::iter::once(&header_cells).chain(wrapped_rows.iter()) {
        for (col, cell_lines) in cells.iter().enumerate() {
            for line in cell_lines {
                widths[col] = widths[col].max(line.width());
            }
        }
    }

    let mut out = String::new();
    let separator = grid_separator(&widths);
    writeln!(out, "{separator}")?;
    write_grid_row(&mut out, &header_cells, &widths)?;
    writeln!(out, "{separator}")?;
    for cells in &wrapped_rows {
        write_grid_row(&mut out, cells, &widths)?;
        writeln!(out, "{separator}")?;
    }
    Ok(out)
}

fn grid_separator(widths: &[usize]) -> String {
    let mut sep = String::from("+");
    for width in widths {
        sep.push_str(&"-".repeat(width + 2));
        sep.push('+');
    }
    sep
}

fn write_grid_row(
    out: &mut String,
    cells: &[Vec<String>],
    widths: &[usize],
) -> Result<(), std::fmt::Error> {
    let height = cells.iter().map(Vec::len).max().unwrap_or(1);
    for row_line in 0..height {
        out.push('|');
        for (col, cell_lines) in cells.iter().enumerate() {
            let text = cell_lines.get(row_line).map(String::as_str).unwrap_or("");
            let padding = widths[col].saturating_sub(text.width());
            write!(out, " {}{} |", text, " ".repeat(padding))?;
        }
        out.push('\n');
    }
    Ok(())
}

/// Word-wrap `text` to at most `max` display columns per line, hard
/// splitting words that are wider than the whole column.
fn wrap_text(text: &str, max: usize) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        for piece in split_wide_word(word, max) {
            let needed = if current.is_empty() {
                piece.width()
            } else {
                current.width() + 1 + piece.width()
            };
            if needed > max && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&piece);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn split_wide_word(word: &str, max: usize) -> Vec<String> {
    if word.width() <= max {
        return vec![word.to_string()];
    }
    let mut pieces = Vec::new();
    let mut current = String::new();
    for ch in word.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if current.width() + ch_width > max && !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

fn render_list(report: &FileReport) -> anyhow::Result<String> {
    if report.findings.is_empty() {
        return Ok(format!("{NO_ISSUES}\n"));
    }

    let mut out = String::new();
    for (idx, finding) in report.findings.iter().enumerate() {
        let lines = finding
            .line_numbers
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(
            out,
            "{}. {} [{}] (Severity: {})",
            idx + 1,
            finding.title,
            finding.issue_type,
            finding.severity
        )?;
        writeln!(out, "   Lines: {lines}")?;
        writeln!(out, "   Description: {}", finding.description)?;
        writeln!(out, "   Suggestion: {}", finding.suggestion)?;
        writeln!(out, "{}", "-".repeat(80))?;
    }
    Ok(out)
}
