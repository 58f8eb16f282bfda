//! Command-line interface definitions.
//!
//! # Example
//!
//! ```bash
//! # Group files by size (fast candidate search)
//! dupscan scan ~/Downloads
//!
//! # Confirm duplicates by content digest, JSON output
//! dupscan scan ~/Downloads --by contents --output json
//!
//! # Hash only files whose size is shared by another file
//! dupscan scan ~/Downloads --by contents --size-prefilter
//!
//! # Show the effective configuration
//! dupscan config
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::duplicates::SearchStyle;

/// Find duplicate files by size or content digest.
#[derive(Debug, Parser)]
#[command(name = "dupscan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Application directory for configuration and state
    #[arg(long, value_name = "DIR", global = true, env = "DUPSCAN_APP_DIR")]
    pub app_dir: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory for duplicate files
    Scan(ScanArgs),
    /// Show or save the effective configuration
    Config(ConfigArgs),
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory to scan
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Comparison key: file size or content digest
    #[arg(long = "by", value_enum, value_name = "STYLE")]
    pub search_style: Option<SearchStyle>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Minimum file size to consider (e.g., 1KB, 1MiB)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Maximum file size to consider (e.g., 1GB)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub max_size: Option<u64>,

    /// Gitignore-style patterns to skip (can be repeated)
    #[arg(short, long = "ignore", value_name = "PATTERN")]
    pub ignore_patterns: Vec<String>,

    /// Follow symbolic links during scan
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Do not follow symbolic links, even if enabled in the config
    #[arg(long, conflicts_with = "follow_symlinks")]
    pub no_follow_symlinks: bool,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// Include hidden files, even if skipping is enabled in the config
    #[arg(long, conflicts_with = "skip_hidden")]
    pub no_skip_hidden: bool,

    /// Also skip files matched by the .gitignore in PATH
    #[arg(long)]
    pub respect_gitignore: bool,

    /// Ignore the .gitignore in PATH, even if enabled in the config
    #[arg(long, conflicts_with = "respect_gitignore")]
    pub no_respect_gitignore: bool,

    /// Abort on unreadable directories instead of skipping them
    #[arg(long)]
    pub strict: bool,

    /// Skip unreadable directories, even if strict mode is enabled in the config
    #[arg(long, conflicts_with = "strict")]
    pub no_strict: bool,

    /// With --by contents, only hash files whose size is shared
    #[arg(long)]
    pub size_prefilter: bool,

    /// Hash every file, even if the size prefilter is enabled in the config
    #[arg(long, conflicts_with = "size_prefilter")]
    pub no_size_prefilter: bool,

    /// Do not draw a progress indicator
    #[arg(long)]
    pub no_progress: bool,
}

/// Arguments for the config subcommand.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Write the effective configuration to the application directory
    #[arg(long)]
    pub save: bool,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing
    Text,
    /// JSON for scripting
    Json,
    /// CSV, one row per file
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Parse a human-readable size such as `1024`, `1KB` or `1.5 MiB` into bytes.
///
/// ```
/// use dupscan::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1KiB").unwrap(), 1024);
/// assert_eq!(parse_size("1MB").unwrap(), 1_000_000);
/// ```
///
/// # Errors
///
/// Returns a message if the string is empty or not a valid size.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }
    s.parse::<bytesize::ByteSize>()
        .map(|size| size.as_u64())
        .map_err(|e| format!("Invalid size '{s}': {e}"))
}
