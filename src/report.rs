/*!
 * Reporting functionality for projdump
 *
 * Renders export and import summaries as console tables (via the tabled
 * crate) or as JSON.
 */

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::config::ReportFormat;
use crate::error::Result;
use crate::types::{ExportSummary, FileReportInfo, ImportReport};
use crate::utils::format_file_size;

/// Maximum number of file rows before only the largest files are listed
const MAX_FILE_ROWS: usize = 15;
/// Number of rows shown when the list is truncated
const TOP_FILE_ROWS: usize = 10;

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Metric")]
    key: String,

    #[tabled(rename = "Value")]
    value: String,
}

impl SummaryRow {
    fn new(key: &str, value: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            value: value.into(),
        }
    }
}

#[derive(Tabled)]
struct FileRow {
    #[tabled(rename = "File Path")]
    path: String,

    #[tabled(rename = "Lines")]
    lines: String,

    #[tabled(rename = "Chars")]
    chars: String,
}

#[derive(Tabled)]
struct ProblemRow {
    #[tabled(rename = "File Path")]
    path: String,

    #[tabled(rename = "Reason")]
    reason: String,
}

#[derive(Serialize)]
struct TimedReport<'a, T: Serialize> {
    duration_ms: u128,
    #[serde(flatten)]
    report: &'a T,
}

/// Report generator for command results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Render an export summary
    pub fn export_report(&self, summary: &ExportSummary, duration: Duration) -> Result<String> {
        match self.format {
            ReportFormat::Table => Ok(self.export_tables(summary, duration)),
            ReportFormat::Json => to_json(summary, duration),
        }
    }

    /// Render an import report
    pub fn import_report(&self, report: &ImportReport, duration: Duration) -> Result<String> {
        match self.format {
            ReportFormat::Table => Ok(self.import_tables(report, duration)),
            ReportFormat::Json => to_json(report, duration),
        }
    }

    fn export_tables(&self, summary: &ExportSummary, duration: Duration) -> String {
        let mut sections = vec![self.files_section(&summary.file_details)];

        if !summary.skipped.is_empty() {
            let rows = summary.skipped.iter().map(|s| ProblemRow {
                path: format_path(&s.path, 60),
                reason: s.reason.clone(),
            });
            sections.push(format!("⚠️  SKIPPED FILES\n{}", styled(Table::new(rows))));
        }

        let rows = vec![
            SummaryRow::new("📂 Output File", summary.output_file.display().to_string()),
            SummaryRow::new("📦 Document Size", format_file_size(summary.document_bytes)),
            SummaryRow::new("⏱️ Process Time", format!("{:.4?}", duration)),
            SummaryRow::new("🌳 Tree Entries", format_number(summary.tree_entries)),
            SummaryRow::new("📄 Files Exported", format_number(summary.files_exported)),
            SummaryRow::new("📝 Total Lines", format_number(summary.total_lines)),
            SummaryRow::new("🔤 Total Chars", format_number(summary.total_chars)),
            SummaryRow::new("⚠️ Files Skipped", format_number(summary.skipped.len())),
        ];
        sections.push(format!("✅  EXPORT COMPLETE\n{}", styled(Table::new(rows))));

        sections.join("\n\n")
    }

    fn import_tables(&self, report: &ImportReport, duration: Duration) -> String {
        let mut sections = vec![self.files_section(&report.file_details)];

        if !report.failures.is_empty() {
            let rows = report.failures.iter().map(|f| ProblemRow {
                path: format_path(&f.path, 60),
                reason: f.reason.clone(),
            });
            sections.push(format!("❌  FAILED FILES\n{}", styled(Table::new(rows))));
        }

        let title = if report.is_complete() {
            "✅  IMPORT COMPLETE"
        } else {
            "⚠️  IMPORT FINISHED WITH ERRORS"
        };
        let rows = vec![
            SummaryRow::new("📂 Destination", report.destination.display().to_string()),
            SummaryRow::new("⏱️ Process Time", format!("{:.4?}", duration)),
            SummaryRow::new("📄 Files Imported", format_number(report.imported.len())),
            SummaryRow::new("❌ Files Failed", format_number(report.failures.len())),
        ];
        sections.push(format!("{}\n{}", title, styled(Table::new(rows))));

        sections.join("\n\n")
    }

    fn files_section(&self, details: &BTreeMap<String, FileReportInfo>) -> String {
        let mut files: Vec<_> = details.iter().collect();
        files.sort_by(|(_, a), (_, b)| b.chars.cmp(&a.chars));

        let truncated = files.len() > MAX_FILE_ROWS;
        if truncated {
            files.truncate(TOP_FILE_ROWS);
        }

        let rows = files.into_iter().map(|(path, info)| FileRow {
            path: format_path(path, 60),
            lines: format_number(info.lines),
            chars: format_number(info.chars),
        });

        let title = if truncated {
            "📋  TOP 10 LARGEST FILES BY CHARACTER COUNT  📋"
        } else {
            "📋  PROCESSED FILES"
        };
        format!("{}\n{}", title, styled(Table::new(rows)))
    }
}

fn styled(mut table: Table) -> String {
    table
        .with(Style::rounded())
        .with(Padding::new(1, 1, 0, 0))
        .with(Modify::new(Columns::new(..)).with(Alignment::left()));
    table.to_string()
}

fn to_json<T: Serialize>(report: &T, duration: Duration) -> Result<String> {
    let timed = TimedReport {
        duration_ms: duration.as_millis(),
        report,
    };
    Ok(serde_json::to_string_pretty(&timed)?)
}

/// Format a number with human-readable units
pub fn format_number(num: usize) -> String {
    if num >= 1_000_000 {
        format!("{:.1}M", num as f64 / 1_000_000.0)
    } else if num >= 1_000 {
        format!("{:.1}K", num as f64 / 1_000.0)
    } else {
        num.to_string()
    }
}

/// Shorten a relative path to `max_len` characters, keeping its tail
pub fn format_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let parts: Vec<&str> = path.split('/').collect();
    let mut current_len = 3; // "..."
    let mut segments = Vec::new();
    for part in parts.iter().rev() {
        let part_len = part.chars().count() + 1;
        if current_len + part_len > max_len {
            break;
        }
        segments.push(*part);
        current_len += part_len;
    }

    if segments.is_empty() {
        // Single oversized segment: keep its last characters
        let tail: Vec<char> = path.chars().rev().take(max_len.saturating_sub(3)).collect();
        return format!("...{}", tail.into_iter().rev().collect::<String>());
    }

    let mut result = String::from("...");
    for part in segments.iter().rev() {
        result.push('/');
        result.push_str(part);
    }
    result
}
