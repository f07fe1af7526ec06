/*!
 * projdump - Export a project tree into a single Markdown document
 *
 * This library serializes a directory tree (an ASCII structure diagram plus
 * the full text of every file) into one document, and restores the files
 * from such a document.
 */

pub mod clipboard;
pub mod config;
pub mod error;
pub mod exporter;
pub mod filter;
pub mod importer;
pub mod parser;
pub mod progress;
pub mod report;
pub mod serializer;
pub mod tree;
pub mod types;
pub mod utils;

#[cfg(test)]
mod tests;

// Re-export main components for easier access
pub use config::{ExportConfig, ImportConfig, ImportSource, ReportFormat};
pub use error::{ProjDumpError, Result};
pub use exporter::{export_project, Exporter};
pub use filter::FilterRules;
pub use importer::import_project;
pub use parser::{parse_document, validate_document};
pub use progress::{NoProgress, ProgressEvent, ProgressReporter};
pub use report::Reporter;
pub use serializer::ContentSerializer;
pub use tree::TreeRenderer;
pub use types::{ExportSummary, FileRecord, FileSection, ImportFailure, ImportReport};
pub use utils::{count_files, format_file_size};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
