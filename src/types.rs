/*!
 * Core types and data structures for projdump
 */

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

/// A text file read from the exported tree
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Root-relative path with forward slashes
    pub rel_path: String,
    /// Full UTF-8 content
    pub content: String,
}

/// A file section recovered from an export document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSection {
    /// Relative path as written in the section heading
    pub path: String,
    /// Language tag of the opening fence (may be empty)
    pub language: String,
    /// Body between the fences, trimmed
    pub content: String,
}

/// Size information about one file in a report
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileReportInfo {
    /// Number of lines in the file
    pub lines: usize,
    /// Number of characters in the file
    pub chars: usize,
}

impl FileReportInfo {
    /// Measure a piece of text
    pub fn measure(content: &str) -> Self {
        Self {
            lines: content.lines().count(),
            chars: content.chars().count(),
        }
    }
}

/// A file that was left out of an export because it could not be read
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    /// Root-relative path
    pub path: String,
    /// Reason reported by the filesystem
    pub reason: String,
}

/// Outcome of an export
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportSummary {
    /// Document that was written
    pub output_file: PathBuf,
    /// Size of the written document in bytes
    pub document_bytes: u64,
    /// Number of lines in the tree section
    pub tree_entries: usize,
    /// Number of files written into the contents section
    pub files_exported: usize,
    /// Total number of lines across exported files
    pub total_lines: usize,
    /// Total number of characters across exported files
    pub total_chars: usize,
    /// Per-file sizes, keyed by relative path
    pub file_details: BTreeMap<String, FileReportInfo>,
    /// Files omitted because reading them failed
    pub skipped: Vec<SkippedFile>,
}

impl ExportSummary {
    pub(crate) fn record(&mut self, record: &FileRecord) {
        let info = FileReportInfo::measure(&record.content);
        self.files_exported += 1;
        self.total_lines += info.lines;
        self.total_chars += info.chars;
        self.file_details.insert(record.rel_path.clone(), info);
    }
}

/// A file that could not be restored during an import
#[derive(Debug, Clone, Serialize)]
pub struct ImportFailure {
    /// Relative path from the section heading
    pub path: String,
    /// What went wrong
    pub reason: String,
}

/// Outcome of an import
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    /// Directory files were restored into
    pub destination: PathBuf,
    /// Files written, in document order
    pub imported: Vec<PathBuf>,
    /// Per-file sizes, keyed by relative path
    pub file_details: BTreeMap<String, FileReportInfo>,
    /// Files that could not be written
    pub failures: Vec<ImportFailure>,
}

impl ImportReport {
    /// Whether every section of the document was restored
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
