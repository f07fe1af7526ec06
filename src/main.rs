/*!
 * Command-line interface for projdump
 */

use std::fs;
use std::io;
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use simplelog::{ColorChoice, TermLogger, TerminalMode};

use projdump::clipboard::copy_to_clipboard;
use projdump::config::{Args, Command, ExportArgs, ExportConfig, ImportArgs, ImportConfig};
use projdump::error::{ProjDumpError, Result, ResultExt};
use projdump::exporter::export_project;
use projdump::importer::import_project;
use projdump::progress::BarReporter;
use projdump::report::Reporter;
use projdump::serializer::FILE_HEADING;
use projdump::utils::count_files;

fn main() -> io::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Export(export) => run_export(export)?,
        Command::Import(import) => run_import(import)?,
        Command::Completions { shell } => {
            let mut command = Args::command();
            generate(shell, &mut command, "projdump", &mut io::stdout());
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    if let Err(e) = TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }
}

fn progress_bar(prefix: &'static str) -> ProgressBar {
    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len} ⏱️  Elapsed: {elapsed_precise}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_prefix(prefix);
    progress
}

fn run_export(args: ExportArgs) -> Result<()> {
    let config = ExportConfig::from_args(args)?;
    config.validate()?;

    let progress = progress_bar("📊 Exporting");
    progress.set_message(format!(
        "📂 Scanning directory: {}",
        config.target_dir.display()
    ));

    match count_files(&config.target_dir, &config.rules) {
        Ok(count) => progress.set_length(count),
        Err(e) => log::warn!("Failed to count files: {}", e),
    }

    let start_time = Instant::now();
    let result = export_project(
        &config.target_dir,
        &config.output_file,
        &config.rules,
        &BarReporter(progress.clone()),
    );
    let duration = start_time.elapsed();
    progress.finish_and_clear();

    let summary = result?;

    if config.clip {
        let document = fs::read_to_string(&config.output_file).with_context(|| {
            format!("Failed to read {}", config.output_file.display())
        })?;
        match copy_to_clipboard(&document) {
            Ok(()) => println!("📋 Export copied to clipboard"),
            Err(e) => log::warn!("Failed to copy to clipboard: {}", e),
        }
    }

    let reporter = Reporter::new(config.report);
    println!("\n{}", reporter.export_report(&summary, duration)?);
    Ok(())
}

fn run_import(args: ImportArgs) -> Result<()> {
    let config = ImportConfig::from_args(args)?;
    config.validate()?;

    let document = config.source.read()?;
    if document.trim().is_empty() {
        return Err(ProjDumpError::Config("No import source selected".to_string()));
    }

    let progress = progress_bar("📥 Importing");
    let sections = document
        .lines()
        .filter(|line| line.starts_with(FILE_HEADING))
        .count();
    progress.set_length(sections as u64);

    let start_time = Instant::now();
    let result = import_project(&document, &config.destination, &BarReporter(progress.clone()));
    let duration = start_time.elapsed();
    progress.finish_and_clear();

    let report = result?;
    let reporter = Reporter::new(config.report);
    println!("\n{}", reporter.import_report(&report, duration)?);

    if !report.is_complete() {
        return Err(ProjDumpError::Unexpected(format!(
            "{} file(s) could not be imported",
            report.failures.len()
        )));
    }
    Ok(())
}
