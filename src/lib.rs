//! dupscan - duplicate file finder
//!
//! Walks a directory tree, derives a comparison key for every regular file
//! (its size, or the SHA-1 digest of its contents) and reports the keys
//! shared by two or more files.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::{Cli, Commands, ConfigArgs, OutputFormat, ScanArgs};
use crate::config::Config;
use crate::duplicates::{ensure_app_dir, DuplicateFinder};
use crate::error::ExitCode;
use crate::output::{CsvOutput, JsonOutput, TextOutput};
use crate::progress::Progress;

/// Run the application for parsed command-line arguments.
///
/// Returns [`ExitCode::Success`] when duplicates were found (or a non-scan
/// command succeeded) and [`ExitCode::NoDuplicates`] when a scan found none.
///
/// # Errors
///
/// Returns any configuration, bootstrap, validation, walk or read failure.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let app_dir = match cli.app_dir {
        Some(dir) => dir,
        None => Config::default_app_dir()?,
    };
    log::debug!("Application directory: {}", app_dir.display());

    match cli.command {
        Commands::Scan(args) => handle_scan(args, app_dir, cli.quiet),
        Commands::Config(args) => handle_config(&args, &app_dir),
    }
}

fn handle_scan(args: ScanArgs, app_dir: PathBuf, quiet: bool) -> Result<ExitCode> {
    let mut config = Config::load(&app_dir)?;
    config.apply_scan_args(&args);

    let mut finder_config = config.finder_config();
    if !quiet && !args.no_progress {
        finder_config = finder_config.with_progress_callback(Arc::new(Progress::new(false)));
    }

    let finder = DuplicateFinder::new(app_dir, finder_config)?;
    let (index, summary) = finder.scan(&args.path)?;

    let exit_code = if summary.duplicate_groups > 0 {
        ExitCode::Success
    } else {
        ExitCode::NoDuplicates
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.output {
        OutputFormat::Text => {
            TextOutput::new(&index, &summary, finder.search_style()).write_to(&mut out)?;
        }
        OutputFormat::Json => {
            JsonOutput::new(&index, &summary, finder.search_style(), exit_code)
                .write_to(&mut out)?;
        }
        OutputFormat::Csv => CsvOutput::new(&index).write_to(&mut out)?,
    }
    out.flush()?;

    Ok(exit_code)
}

fn handle_config(args: &ConfigArgs, app_dir: &Path) -> Result<ExitCode> {
    let config = Config::load(app_dir)?;
    print!("{}", config.to_toml()?);

    if args.save {
        ensure_app_dir(app_dir)?;
        let path = config
            .save(app_dir)
            .with_context(|| format!("Failed to save configuration in {}", app_dir.display()))?;
        log::info!("Configuration saved to {}", path.display());
    }

    Ok(ExitCode::Success)
}
