//! Application configuration.
//!
//! Settings are layered with figment, lowest priority first:
//! 1. Built-in defaults
//! 2. `config.toml` in the application directory
//! 3. Environment variables prefixed with `DUPSCAN_` (e.g. `DUPSCAN_SEARCH_STYLE=contents`)
//! 4. Command-line flags (applied by [`Config::apply_scan_args`])

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::ScanArgs;
use crate::duplicates::{FinderConfig, SearchStyle};
use crate::scanner::{WalkerConfig, DEFAULT_BUFFER_SIZE};

/// File name of the configuration file inside the application directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "DUPSCAN_";

/// Scan configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Comparison key strategy
    pub search_style: SearchStyle,
    /// Follow symbolic links
    pub follow_symlinks: bool,
    /// Skip dot-files and dot-directories
    pub skip_hidden: bool,
    /// Gitignore-style patterns to skip
    pub ignore_patterns: Vec<String>,
    /// Apply the `.gitignore` found at the scan root
    pub respect_gitignore: bool,
    /// Minimum file size in bytes
    pub min_size: Option<u64>,
    /// Maximum file size in bytes
    pub max_size: Option<u64>,
    /// Treat walk errors as fatal
    pub strict: bool,
    /// Hash only files with a shared size under `ByContents`
    pub size_prefilter: bool,
    /// Read buffer size for hashing
    pub buffer_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_style: SearchStyle::BySize,
            follow_symlinks: false,
            skip_hidden: false,
            ignore_patterns: Vec::new(),
            respect_gitignore: false,
            min_size: None,
            max_size: None,
            strict: false,
            size_prefilter: false,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl Config {
    /// Platform-specific default application directory.
    ///
    /// # Errors
    ///
    /// Fails if no home directory can be determined.
    pub fn default_app_dir() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "dupscan", "dupscan")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        Ok(project_dirs.config_dir().to_path_buf())
    }

    /// Path of the configuration file inside `app_dir`.
    #[must_use]
    pub fn config_path(app_dir: &Path) -> PathBuf {
        app_dir.join(CONFIG_FILE_NAME)
    }

    /// The layered figment for `app_dir`: defaults, then file, then environment.
    #[must_use]
    pub fn figment(app_dir: &Path) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(Self::config_path(app_dir)))
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["APP_DIR"]))
    }

    /// Load the configuration for `app_dir`. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Fails if the file or environment contains invalid values.
    pub fn load(app_dir: &Path) -> Result<Self> {
        let config: Self = Self::figment(app_dir)
            .extract()
            .with_context(|| format!("Invalid configuration in {}", app_dir.display()))?;
        log::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Write the configuration to `app_dir` as TOML, returning the file path.
    ///
    /// # Errors
    ///
    /// Fails if serialization or writing fails.
    pub fn save(&self, app_dir: &Path) -> Result<PathBuf> {
        let path = Self::config_path(app_dir);
        let content = self.to_toml()?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(path)
    }

    /// Render as TOML.
    ///
    /// # Errors
    ///
    /// Fails if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// Overlay command-line flags. Each boolean option has a `--no-*` flag
    /// that switches it off; without either flag the configured value stays.
    pub fn apply_scan_args(&mut self, args: &ScanArgs) {
        if let Some(style) = args.search_style {
            self.search_style = style;
        }
        if args.min_size.is_some() {
            self.min_size = args.min_size;
        }
        if args.max_size.is_some() {
            self.max_size = args.max_size;
        }
        self.ignore_patterns
            .extend(args.ignore_patterns.iter().cloned());
        overlay_flag(&mut self.follow_symlinks, args.follow_symlinks, args.no_follow_symlinks);
        overlay_flag(&mut self.skip_hidden, args.skip_hidden, args.no_skip_hidden);
        overlay_flag(
            &mut self.respect_gitignore,
            args.respect_gitignore,
            args.no_respect_gitignore,
        );
        overlay_flag(&mut self.strict, args.strict, args.no_strict);
        overlay_flag(&mut self.size_prefilter, args.size_prefilter, args.no_size_prefilter);
    }

    /// Walker settings derived from this configuration.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig::default()
            .with_follow_symlinks(self.follow_symlinks)
            .with_skip_hidden(self.skip_hidden)
            .with_size_bounds(self.min_size, self.max_size)
            .with_ignore_patterns(self.ignore_patterns.clone())
            .with_respect_gitignore(self.respect_gitignore)
    }

    /// Finder settings derived from this configuration.
    #[must_use]
    pub fn finder_config(&self) -> FinderConfig {
        FinderConfig::default()
            .with_search_style(self.search_style)
            .with_walker_config(self.walker_config())
            .with_strict(self.strict)
            .with_size_prefilter(self.size_prefilter)
            .with_buffer_size(self.buffer_size)
    }
}

fn overlay_flag(value: &mut bool, on: bool, off: bool) {
    if on {
        *value = true;
    } else if off {
        *value = false;
    }
}
