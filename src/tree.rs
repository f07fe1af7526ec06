/*!
 * ASCII tree rendering of the filtered project structure
 */

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::Result;
use crate::filter::FilterRules;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

/// Renders the tree section of an export document
pub struct TreeRenderer<'a> {
    rules: &'a FilterRules,
    skip: Option<PathBuf>,
}

impl<'a> TreeRenderer<'a> {
    /// Create a renderer using the given rules
    pub fn new(rules: &'a FilterRules) -> Self {
        Self { rules, skip: None }
    }

    /// Leave one specific path out of the tree (the output document)
    pub fn skip_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.skip = Some(path.into());
        self
    }

    /// Render the tree below `root`, one entry per line
    ///
    /// Siblings are sorted by name. Excluded entries are removed before the
    /// last sibling is determined, so the final visible entry of every
    /// directory carries the `└── ` glyph.
    pub fn render(&self, root: &Path) -> Result<String> {
        Ok(self.render_lines(root)?.join("\n"))
    }

    /// Render the tree as individual lines
    pub fn render_lines(&self, root: &Path) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        self.render_dir(root, "", &mut lines)?;
        Ok(lines)
    }

    fn render_dir(&self, dir: &Path, prefix: &str, lines: &mut Vec<String>) -> Result<()> {
        let entries: Vec<DirEntry> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .collect::<std::result::Result<_, _>>()?;

        let visible: Vec<DirEntry> = entries
            .into_iter()
            .filter(|e| self.is_visible(e))
            .collect();

        let count = visible.len();
        for (idx, entry) in visible.iter().enumerate() {
            let is_last = idx + 1 == count;
            let glyph = if is_last { LAST_BRANCH } else { BRANCH };
            let name = entry.file_name().to_string_lossy();

            if entry.file_type().is_dir() {
                lines.push(format!("{}{}{}/", prefix, glyph, name));
                let child_prefix = format!("{}{}", prefix, if is_last { SPACE } else { PIPE });
                self.render_dir(entry.path(), &child_prefix, lines)?;
            } else {
                lines.push(format!("{}{}{}", prefix, glyph, name));
            }
        }

        Ok(())
    }

    fn is_visible(&self, entry: &DirEntry) -> bool {
        if self.skip.as_deref() == Some(entry.path()) {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        !self.rules.excludes_entry(&name, entry.file_type().is_dir())
    }
}
