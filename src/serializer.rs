/*!
 * Serialization of file contents into the export document
 */

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::Result;
use crate::filter::{language_tag, FilterRules};
use crate::progress::{ProgressEvent, ProgressReporter};
use crate::types::{ExportSummary, FileRecord, SkippedFile};

/// Heading prefix that opens every file section
pub const FILE_HEADING: &str = "### 📝 `";
/// Code fence delimiter
pub const FENCE: &str = "```";
/// Horizontal rule separating sections
pub const RULE: &str = "---";

/// Walks a project and writes one fenced section per text file
pub struct ContentSerializer<'a> {
    rules: &'a FilterRules,
    skip: Option<PathBuf>,
}

impl<'a> ContentSerializer<'a> {
    /// Create a serializer using the given rules
    pub fn new(rules: &'a FilterRules) -> Self {
        Self { rules, skip: None }
    }

    /// Never serialize this path (the output document itself)
    pub fn skip_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.skip = Some(path.into());
        self
    }

    /// Write the contents section for every included file under `root`
    ///
    /// Files are visited depth-first in directory-listing order. A file that
    /// cannot be read is logged, recorded in `summary.skipped` and left out;
    /// only traversal and write failures abort.
    pub fn serialize<W: Write>(
        &self,
        root: &Path,
        out: &mut W,
        summary: &mut ExportSummary,
        progress: &dyn ProgressReporter,
    ) -> Result<()> {
        let walker = WalkDir::new(root)
            .min_depth(1)
            .into_iter()
            .filter_entry(|e| !self.is_excluded(e));

        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_dir() {
                continue;
            }

            let rel_path = relative_posix_path(root, entry.path());
            let content = match fs::read_to_string(entry.path()) {
                Ok(content) => content,
                Err(e) => {
                    log::warn!("Error reading file {}: {}", entry.path().display(), e);
                    summary.skipped.push(SkippedFile {
                        path: rel_path,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let record = FileRecord { rel_path, content };
            let name = entry.file_name().to_string_lossy();
            write_section(out, &record, &language_tag(&name))?;
            summary.record(&record);
            progress.report(&ProgressEvent::Exported(record.rel_path));
        }

        Ok(())
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        if self.skip.as_deref() == Some(entry.path()) {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        self.rules.excludes_entry(&name, entry.file_type().is_dir())
    }
}

/// Write one file section: heading, fenced content, rule
pub fn write_section<W: Write>(out: &mut W, record: &FileRecord, language: &str) -> Result<()> {
    write!(out, "{}{}`\n\n", FILE_HEADING, record.rel_path)?;
    write!(out, "{}{}\n", FENCE, language)?;
    out.write_all(record.content.as_bytes())?;
    write!(out, "\n{}\n\n", FENCE)?;
    write!(out, "{}\n\n", RULE)?;
    Ok(())
}

/// Root-relative path joined with forward slashes on every platform
pub fn relative_posix_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
