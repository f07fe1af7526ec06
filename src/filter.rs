/*!
 * Denylist filtering shared by the tree renderer and the content serializer
 */

use std::collections::HashSet;
use std::path::Path;

use once_cell::sync::Lazy;

/// Directory names that are never traversed
pub static DEFAULT_IGNORE_DIRS: Lazy<Vec<&'static str>> =
    Lazy::new(|| vec![".git", "node_modules", ".vscode", "dist", "build", "out"]);

/// File extensions (with leading dot) whose files are never exported
pub static DEFAULT_IGNORE_EXTENSIONS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // Images
        ".png", ".jpg", ".jpeg", ".gif", ".svg",
        // Fonts
        ".woff", ".woff2", ".ttf", ".eot",
        // Archives
        ".zip", ".tar", ".gz", ".rar",
        // Binaries
        ".exe", ".dll", ".so", ".dylib",
        // Generated
        ".lock", ".log", ".vsix",
        // Export documents
        ".claude",
    ]
});

/// Exact file names that are never exported
pub static DEFAULT_IGNORE_FILES: Lazy<Vec<&'static str>> = Lazy::new(|| vec!["package-lock.json"]);

/// Immutable set of denylists consulted during traversal
#[derive(Debug, Clone)]
pub struct FilterRules {
    dirs: HashSet<String>,
    /// Stored lowercased, always with a leading dot
    extensions: HashSet<String>,
    files: HashSet<String>,
}

impl Default for FilterRules {
    fn default() -> Self {
        Self::new(
            DEFAULT_IGNORE_DIRS.iter().copied(),
            DEFAULT_IGNORE_EXTENSIONS.iter().copied(),
            DEFAULT_IGNORE_FILES.iter().copied(),
        )
    }
}

impl FilterRules {
    /// Build a rule set from explicit lists
    pub fn new<D, E, F>(dirs: D, extensions: E, files: F) -> Self
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
        F: IntoIterator,
        F::Item: AsRef<str>,
    {
        Self {
            dirs: dirs.into_iter().map(|d| d.as_ref().to_string()).collect(),
            extensions: extensions
                .into_iter()
                .map(|e| normalize_extension(e.as_ref()))
                .filter(|e| e != ".")
                .collect(),
            files: files.into_iter().map(|f| f.as_ref().to_string()).collect(),
        }
    }

    /// Default rules extended with additional entries
    pub fn with_additions(dirs: &[String], extensions: &[String], files: &[String]) -> Self {
        Self::new(
            DEFAULT_IGNORE_DIRS
                .iter()
                .map(|d| d.to_string())
                .chain(dirs.iter().cloned()),
            DEFAULT_IGNORE_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .chain(extensions.iter().cloned()),
            DEFAULT_IGNORE_FILES
                .iter()
                .map(|f| f.to_string())
                .chain(files.iter().cloned()),
        )
    }

    /// Whether a single path segment names an excluded directory
    pub fn is_excluded_dir(&self, segment: &str) -> bool {
        self.dirs.contains(segment)
    }

    /// Whether an extension (leading dot included) is excluded, ignoring case
    pub fn is_excluded_extension(&self, ext: &str) -> bool {
        !ext.is_empty() && self.extensions.contains(&ext.to_lowercase())
    }

    /// Whether a file name is excluded by exact match
    pub fn is_excluded_file(&self, name: &str) -> bool {
        self.files.contains(name)
    }

    /// Whether any segment of a root-relative path is an excluded directory
    pub fn is_in_excluded_dir(&self, rel_path: &Path) -> bool {
        rel_path
            .components()
            .any(|c| self.is_excluded_dir(&c.as_os_str().to_string_lossy()))
    }

    /// Whether a file with this name is left out, by name or by extension
    pub fn excludes_file_name(&self, name: &str) -> bool {
        self.is_excluded_file(name) || self.is_excluded_extension(&dotted_extension(name))
    }

    /// Single predicate used by both traversals
    ///
    /// Directory names match any path segment, including a file's own name,
    /// so a file called `build` is left out like a `build/` directory.
    pub fn excludes_entry(&self, name: &str, is_dir: bool) -> bool {
        self.is_excluded_dir(name) || (!is_dir && self.excludes_file_name(name))
    }
}

/// Extension of a file name including its leading dot, or "" when there is none
///
/// Dotfiles such as `.gitignore` have no extension; `archive.tar.gz` yields `.gz`.
pub fn dotted_extension(name: &str) -> String {
    match name.rfind('.') {
        Some(0) | None => String::new(),
        Some(idx) => name[idx..].to_string(),
    }
}

/// Language tag for a fenced block: the extension without its dot
pub fn language_tag(name: &str) -> String {
    dotted_extension(name).trim_start_matches('.').to_string()
}

fn normalize_extension(ext: &str) -> String {
    let lower = ext.trim().to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}
