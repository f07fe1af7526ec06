/*!
 * Configuration handling for projdump
 */

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::bail;
use crate::clipboard::paste_from_clipboard;
use crate::error::{Result, ResultExt};
use crate::exporter::{default_output_path, DOCUMENT_EXTENSION};
use crate::filter::FilterRules;

/// Format of the summary printed after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// Console tables (default)
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

/// Command-line arguments for projdump
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "projdump",
    version = env!("CARGO_PKG_VERSION"),
    about = "Export a project tree into a single Markdown document and restore it again",
    long_about = "Serializes a directory tree (structure diagram plus the full text of every file) into one Markdown document, and reconstructs the files from such a document."
)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Command,

    /// Log debug diagnostics to stderr
    #[clap(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Export a directory into a project document
    Export(ExportArgs),
    /// Restore files from a project document
    Import(ImportArgs),
    /// Print shell completions
    Completions {
        /// Shell to generate completions for
        #[clap(value_enum)]
        shell: Shell,
    },
}

/// Arguments of `projdump export`
#[derive(clap::Args, Debug, Clone)]
pub struct ExportArgs {
    /// Project directory to export
    #[clap(default_value = ".")]
    pub directory_path: String,

    /// Output document (defaults to <directory>/<name>.claude)
    pub output_file: Option<String>,

    /// Comma-separated directory names to skip, in addition to the defaults
    #[clap(long, value_delimiter = ',')]
    pub ignore_dirs: Vec<String>,

    /// Comma-separated file extensions to skip, in addition to the defaults
    #[clap(long, value_delimiter = ',')]
    pub ignore_exts: Vec<String>,

    /// Comma-separated exact file names to skip, in addition to the defaults
    #[clap(long, value_delimiter = ',')]
    pub ignore_files: Vec<String>,

    /// Copy the document to the system clipboard
    #[clap(long, help = "Copy output to system clipboard")]
    pub clip: bool,

    /// Summary format
    #[clap(long, value_enum, default_value_t = ReportFormat::default())]
    pub report: ReportFormat,
}

/// Arguments of `projdump import`
#[derive(clap::Args, Debug, Clone)]
pub struct ImportArgs {
    /// Project document to import, `-` for stdin
    #[clap(required_unless_present = "clipboard")]
    pub source: Option<String>,

    /// Read the document from the system clipboard
    #[clap(long, conflicts_with = "source")]
    pub clipboard: bool,

    /// Directory to restore files into
    #[clap(long, short, default_value = ".")]
    pub destination: String,

    /// Summary format
    #[clap(long, value_enum, default_value_t = ReportFormat::default())]
    pub report: ReportFormat,
}

/// Export configuration
#[derive(Clone, Debug)]
pub struct ExportConfig {
    /// Directory to export
    pub target_dir: PathBuf,

    /// Document path
    pub output_file: PathBuf,

    /// Denylists, fixed for the whole run
    pub rules: FilterRules,

    /// Copy output to clipboard
    pub clip: bool,

    /// Summary format
    pub report: ReportFormat,
}

impl ExportConfig {
    /// Create configuration from command-line arguments
    pub fn from_args(args: ExportArgs) -> Result<Self> {
        let target_dir = PathBuf::from(&args.directory_path);
        let output_file = match args.output_file {
            Some(name) => normalize_output_name(&name)?,
            None => default_output_path(&target_dir),
        };

        Ok(Self {
            rules: FilterRules::with_additions(&args.ignore_dirs, &args.ignore_exts, &args.ignore_files),
            target_dir,
            output_file,
            clip: args.clip,
            report: args.report,
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.target_dir.is_dir() {
            bail!(
                Config,
                "Target directory not found: {}",
                self.target_dir.display()
            );
        }

        if let Some(parent) = self.output_file.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                bail!(Config, "Output directory not found: {}", parent.display());
            }
        }

        if self.output_file.is_dir() {
            bail!(
                Config,
                "Output path is a directory: {}",
                self.output_file.display()
            );
        }

        Ok(())
    }
}

/// Where an import reads its document from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportSource {
    /// A document on disk
    File(PathBuf),
    /// Standard input
    Stdin,
    /// The system clipboard
    Clipboard,
}

impl ImportSource {
    /// Read the whole document from this source
    pub fn read(&self) -> Result<String> {
        match self {
            Self::File(path) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display())),
            Self::Stdin => {
                let mut document = String::new();
                io::stdin()
                    .read_to_string(&mut document)
                    .with_context(|| "Failed to read standard input")?;
                Ok(document)
            }
            Self::Clipboard => Ok(paste_from_clipboard()?),
        }
    }
}

/// Import configuration
#[derive(Clone, Debug)]
pub struct ImportConfig {
    /// Document source
    pub source: ImportSource,

    /// Destination root
    pub destination: PathBuf,

    /// Summary format
    pub report: ReportFormat,
}

impl ImportConfig {
    /// Create configuration from command-line arguments
    pub fn from_args(args: ImportArgs) -> Result<Self> {
        let source = match (args.clipboard, args.source.as_deref()) {
            (true, _) => ImportSource::Clipboard,
            (false, Some("-")) => ImportSource::Stdin,
            (false, Some(path)) => ImportSource::File(PathBuf::from(path)),
            (false, None) => bail!(Config, "No import source selected"),
        };

        Ok(Self {
            source,
            destination: PathBuf::from(args.destination),
            report: args.report,
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let ImportSource::File(path) = &self.source {
            if !path.is_file() {
                bail!(Config, "Import document not found: {}", path.display());
            }
        }

        if self.destination.exists() && !self.destination.is_dir() {
            bail!(
                Config,
                "Destination is not a directory: {}",
                self.destination.display()
            );
        }

        Ok(())
    }
}

/// Apply the document naming convention to a user-supplied output name
///
/// Empty names are rejected; names without the `.claude` extension get it
/// appended.
pub fn normalize_output_name(name: &str) -> Result<PathBuf> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        bail!(Config, "Filename cannot be empty");
    }

    let path = if trimmed.ends_with(DOCUMENT_EXTENSION) {
        PathBuf::from(trimmed)
    } else {
        PathBuf::from(format!("{}{}", trimmed, DOCUMENT_EXTENSION))
    };

    if path.file_name().is_none() || path.file_name() == Some(Path::new(DOCUMENT_EXTENSION).as_os_str()) {
        bail!(Config, "Invalid export file name: {}", name);
    }
    Ok(path)
}
