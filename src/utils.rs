/*!
 * Utility functions for projdump
 */

use std::path::Path;

use walkdir::WalkDir;

use crate::error::Result;
use crate::filter::FilterRules;

/// Count the files an export of `dir` would visit, for progress tracking
pub fn count_files(dir: &Path, rules: &FilterRules) -> Result<u64> {
    let mut count = 0;
    let walker = WalkDir::new(dir).min_depth(1).into_iter().filter_entry(|e| {
        let name = e.file_name().to_string_lossy();
        !rules.excludes_entry(&name, e.file_type().is_dir())
    });

    for entry in walker {
        if !entry?.file_type().is_dir() {
            count += 1;
        }
    }

    Ok(count)
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
