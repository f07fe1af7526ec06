/*!
 * Export document writer for projdump
 */

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::ensure;
use crate::error::Result;
use crate::filter::FilterRules;
use crate::progress::ProgressReporter;
use crate::serializer::{ContentSerializer, FENCE, RULE};
use crate::tree::TreeRenderer;
use crate::types::ExportSummary;

/// Marker the importer requires before it accepts a document
pub const STRUCTURE_MARKER: &str = "# Project Structure:";
/// Heading of the contents section, also required by the importer
pub const CONTENTS_MARKER: &str = "## 📄 File Contents";
/// Conventional extension of export documents
pub const DOCUMENT_EXTENSION: &str = ".claude";

/// Writes a project export document
pub struct Exporter<'a> {
    rules: &'a FilterRules,
}

impl<'a> Exporter<'a> {
    /// Create an exporter using the given rules
    pub fn new(rules: &'a FilterRules) -> Self {
        Self { rules }
    }

    /// Export `root` into the document at `output`
    ///
    /// The document is written in one sequential pass through a buffered
    /// writer. On any fatal error the partially written output is removed.
    pub fn export(
        &self,
        root: &Path,
        output: &Path,
        progress: &dyn ProgressReporter,
    ) -> Result<ExportSummary> {
        ensure!(
            root.is_dir(),
            Config,
            "Project directory not found: {}",
            root.display()
        );
        let root = fs::canonicalize(root)?;

        let file = File::create(output)?;
        log::debug!("Writing export of {} to {}", root.display(), output.display());

        match self.write_document(&root, output, file, progress) {
            Ok(summary) => Ok(summary),
            Err(e) => {
                if let Err(rm) = fs::remove_file(output) {
                    log::warn!(
                        "Failed to remove partial export {}: {}",
                        output.display(),
                        rm
                    );
                }
                Err(e)
            }
        }
    }

    fn write_document(
        &self,
        root: &Path,
        output: &Path,
        file: File,
        progress: &dyn ProgressReporter,
    ) -> Result<ExportSummary> {
        let output_abs = fs::canonicalize(output)?;
        let mut writer = BufWriter::new(file);
        let mut summary = ExportSummary {
            output_file: output.to_path_buf(),
            ..Default::default()
        };

        write_header(&mut writer, &project_name(root))?;

        let tree = TreeRenderer::new(self.rules)
            .skip_path(&output_abs)
            .render_lines(root)?;
        summary.tree_entries = tree.len();
        write_structure(&mut writer, &tree.join("\n"))?;

        write!(writer, "{}\n\n", CONTENTS_MARKER)?;
        ContentSerializer::new(self.rules)
            .skip_path(&output_abs)
            .serialize(root, &mut writer, &mut summary, progress)?;

        writer.flush()?;
        summary.document_bytes = writer.get_ref().metadata()?.len();
        Ok(summary)
    }
}

/// Export `root` into `output` with the given rules
pub fn export_project(
    root: &Path,
    output: &Path,
    rules: &FilterRules,
    progress: &dyn ProgressReporter,
) -> Result<ExportSummary> {
    Exporter::new(rules).export(root, output, progress)
}

/// Default document path for a project: `<root>/<root-name>.claude`
pub fn default_output_path(root: &Path) -> PathBuf {
    let name = fs::canonicalize(root)
        .map(|abs| project_name(&abs))
        .unwrap_or_else(|_| project_name(root));
    root.join(format!("{}{}", name, DOCUMENT_EXTENSION))
}

/// Name used when the root has no final component, e.g. `/`
const FALLBACK_PROJECT_NAME: &str = "project";

fn project_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| FALLBACK_PROJECT_NAME.to_string())
}

fn write_header<W: Write>(out: &mut W, name: &str) -> Result<()> {
    let timestamp = Local::now().format("%-m/%-d/%Y, %-I:%M:%S %p");
    write!(out, "# 📂 Project Export: {}\n\n", name)?;
    write!(out, "**Exported on:** {}\n\n", timestamp)?;
    write!(out, "{}\n\n", RULE)?;
    Ok(())
}

fn write_structure<W: Write>(out: &mut W, tree: &str) -> Result<()> {
    write!(out, "## 🌳 Project Structure\n\n")?;
    write!(out, "<!-- {} -->\n\n", STRUCTURE_MARKER)?;
    write!(out, "{}\n{}\n{}\n\n", FENCE, tree, FENCE)?;
    write!(out, "{}\n\n", RULE)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;
    use tempfile::tempdir;

    #[test]
    fn test_document_structure() -> Result<()> {
        let dir = tempdir()?;
        let root = dir.path().join("sample-project");
        fs::create_dir_all(root.join("src"))?;
        fs::write(root.join("README.md"), "# Sample Project")?;
        fs::write(root.join("src").join("index.ts"), "console.log(1);")?;
        let output = dir.path().join("sample.claude");

        let rules = FilterRules::default();
        let summary = export_project(&root, &output, &rules, &NoProgress)?;
        let doc = fs::read_to_string(&output)?;

        assert!(doc.starts_with("# 📂 Project Export: sample-project\n\n**Exported on:** "));
        assert!(doc.contains(STRUCTURE_MARKER));
        assert!(doc.contains(CONTENTS_MARKER));
        assert!(doc.contains(
            "## 🌳 Project Structure\n\n<!-- # Project Structure: -->\n\n```\n├── README.md\n└── src/\n    └── index.ts\n```\n\n---\n\n## 📄 File Contents\n\n"
        ));
        assert!(doc.contains("### 📝 `README.md`\n\n```md\n# Sample Project\n```\n\n---\n\n"));
        assert!(doc.contains("### 📝 `src/index.ts`\n\n```ts\nconsole.log(1);\n```\n\n---\n\n"));

        let structure_at = doc.find("## 🌳 Project Structure").unwrap_or(usize::MAX);
        let contents_at = doc.find(CONTENTS_MARKER).unwrap_or(0);
        assert!(structure_at < contents_at);

        assert_eq!(summary.files_exported, 2);
        assert_eq!(summary.tree_entries, 3);
        assert_eq!(summary.document_bytes, doc.len() as u64);
        Ok(())
    }

    #[test]
    fn test_output_inside_root_is_not_exported() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("notes.txt"), "hello")?;
        let output = dir.path().join("notes.md");

        let rules = FilterRules::default();
        let summary = export_project(dir.path(), &output, &rules, &NoProgress)?;
        let doc = fs::read_to_string(&output)?;

        assert_eq!(summary.files_exported, 1);
        assert!(!doc.contains("notes.md"));
        Ok(())
    }

    #[test]
    fn test_missing_root_leaves_no_output() -> Result<()> {
        let dir = tempdir()?;
        let output = dir.path().join("out.claude");
        let rules = FilterRules::default();

        let result = export_project(&dir.path().join("missing"), &output, &rules, &NoProgress);
        assert!(result.is_err());
        assert!(!output.exists());
        Ok(())
    }

    #[test]
    fn test_unwritable_output_fails() -> Result<()> {
        let dir = tempdir()?;
        let output = dir.path().join("no-such-dir").join("out.claude");
        let rules = FilterRules::default();
        assert!(export_project(dir.path(), &output, &rules, &NoProgress).is_err());
        Ok(())
    }

    #[test]
    fn test_default_output_path() -> Result<()> {
        let dir = tempdir()?;
        let root = dir.path().join("my-app");
        fs::create_dir(&root)?;
        assert_eq!(default_output_path(&root), root.join("my-app.claude"));
        Ok(())
    }

    #[test]
    #[cfg(unix)]
    fn test_default_output_path_at_filesystem_root() {
        let root = Path::new("/");
        assert_eq!(default_output_path(root), PathBuf::from("/project.claude"));
        assert_eq!(project_name(root), "project");
    }
}
