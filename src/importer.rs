/*!
 * Restores project files from an export document
 */

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::Result;
use crate::parser::{parse_document, validate_document};
use crate::progress::{ProgressEvent, ProgressReporter};
use crate::types::{FileReportInfo, FileSection, ImportFailure, ImportReport};

/// Import `document` into `destination`
///
/// The document is validated before anything touches the filesystem. After
/// that every section is written independently: a section whose path is
/// unsafe or whose write fails is recorded in [`ImportReport::failures`] and
/// the remaining sections are still restored. Existing files are overwritten.
pub fn import_project(
    document: &str,
    destination: &Path,
    progress: &dyn ProgressReporter,
) -> Result<ImportReport> {
    validate_document(document)?;

    let sections = parse_document(document);
    log::debug!(
        "Importing {} file sections into {}",
        sections.len(),
        destination.display()
    );

    let mut report = ImportReport {
        destination: destination.to_path_buf(),
        ..Default::default()
    };

    for section in &sections {
        match restore_file(destination, section) {
            Ok(written) => {
                log::debug!(
                    "Restored {} ({} block) to {}",
                    section.path,
                    if section.language.is_empty() { "plain" } else { section.language.as_str() },
                    written.display()
                );
                report.imported.push(written);
                report
                    .file_details
                    .insert(section.path.clone(), FileReportInfo::measure(&section.content));
                progress.report(&ProgressEvent::Imported(section.path.clone()));
            }
            Err(e) => {
                log::warn!("Failed to import {}: {}", section.path, e);
                report.failures.push(ImportFailure {
                    path: section.path.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}

fn restore_file(destination: &Path, section: &FileSection) -> io::Result<PathBuf> {
    let rel = safe_relative_path(&section.path)?;
    let target = destination.join(rel);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, &section.content)?;
    Ok(target)
}

/// Turn a heading path into a relative path that stays inside the destination
///
/// Heading paths use `/` between segments. On Windows `\` is a separator too
/// and segments holding `:` (drive prefixes, alternate streams) are refused.
pub fn safe_relative_path(raw: &str) -> io::Result<PathBuf> {
    let unsafe_path = || {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("refusing unsafe path `{}`", raw),
        )
    };

    let mut rel = PathBuf::new();
    for part in raw.split(is_separator) {
        match Path::new(part).components().next() {
            None => {}
            Some(Component::CurDir) => {}
            Some(Component::Normal(_)) if is_portable_segment(part) => rel.push(part),
            _ => return Err(unsafe_path()),
        }
    }

    if raw.starts_with(is_separator) || rel.as_os_str().is_empty() {
        return Err(unsafe_path());
    }
    Ok(rel)
}

#[cfg(windows)]
fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

#[cfg(not(windows))]
fn is_separator(c: char) -> bool {
    c == '/'
}

#[cfg(windows)]
fn is_portable_segment(part: &str) -> bool {
    !part.contains(':')
}

#[cfg(not(windows))]
fn is_portable_segment(_part: &str) -> bool {
    true
}
