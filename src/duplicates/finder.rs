//! Duplicate scan orchestration.
//!
//! # Overview
//!
//! [`DuplicateFinder`] drives one scan of a root directory:
//! 1. **Validate** the root (must exist and be a directory)
//! 2. **Walk** the tree with [`Walker`]
//! 3. **Derive** a key per regular file with the configured [`KeyStrategy`]
//! 4. **Record** `(key, path)` in a fresh [`KeyIndex`]
//!
//! Under [`SearchStyle::ByContents`] a file that cannot be read aborts the
//! scan with [`FinderError::FileReadFailure`]; the partially filled index is
//! dropped. Walk-level errors (unreadable directories, vanished entries) are
//! logged and counted unless strict mode is enabled.
//!
//! # Example
//!
//! ```no_run
//! use dupscan::duplicates::{DuplicateFinder, FinderConfig, SearchStyle};
//! use std::path::Path;
//!
//! let config = FinderConfig::default().with_search_style(SearchStyle::ByContents);
//! let finder = DuplicateFinder::new("/tmp/dupscan", config).unwrap();
//!
//! let (index, summary) = finder.scan(Path::new("/some/path")).unwrap();
//! for group in index.groups() {
//!     println!("{}: {} copies", group.key, group.len());
//! }
//! println!("Found {} duplicate groups", summary.duplicate_groups);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::progress::ProgressCallback;
use crate::scanner::{FileEntry, HashError, Hasher, ScanError, Walker, WalkerConfig};

use super::index::KeyIndex;
use super::strategy::{KeyStrategy, SearchStyle};

/// Configuration for a [`DuplicateFinder`].
#[derive(Clone)]
pub struct FinderConfig {
    /// Comparison key strategy.
    pub search_style: SearchStyle,
    /// Walker filtering and symlink options.
    pub walker_config: WalkerConfig,
    /// Abort on walk errors instead of skipping the entry.
    pub strict: bool,
    /// Under `ByContents`, only hash files whose size is shared by another file.
    pub size_prefilter: bool,
    /// Read buffer size for content hashing.
    pub buffer_size: usize,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinderConfig")
            .field("search_style", &self.search_style)
            .field("walker_config", &self.walker_config)
            .field("strict", &self.strict)
            .field("size_prefilter", &self.size_prefilter)
            .field("buffer_size", &self.buffer_size)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            search_style: SearchStyle::BySize,
            walker_config: WalkerConfig::default(),
            strict: false,
            size_prefilter: false,
            buffer_size: crate::scanner::DEFAULT_BUFFER_SIZE,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the comparison key strategy.
    #[must_use]
    pub fn with_search_style(mut self, style: SearchStyle) -> Self {
        self.search_style = style;
        self
    }

    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Enable or disable strict mode (walk errors are fatal).
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Enable or disable the size prefilter for content scans.
    #[must_use]
    pub fn with_size_prefilter(mut self, enabled: bool) -> Self {
        self.size_prefilter = enabled;
        self
    }

    /// Set the hashing buffer size.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Statistics about a completed scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Regular files yielded by the walker
    pub total_files: usize,
    /// Files recorded in the index
    pub indexed_files: usize,
    /// Files not hashed because no other file had the same size
    pub skipped_unique_size: usize,
    /// Distinct keys in the index
    pub distinct_keys: usize,
    /// Keys shared by two or more files
    pub duplicate_groups: usize,
    /// Redundant copies across all groups (group size minus one, summed)
    pub duplicate_files: usize,
    /// Walk errors that were logged and skipped
    pub walk_errors: usize,
    /// Wall-clock duration of the scan
    pub scan_duration: Duration,
}

impl ScanSummary {
    fn finish(&mut self, index: &KeyIndex, started: Instant) {
        self.indexed_files = index.file_count();
        self.distinct_keys = index.len();
        self.duplicate_groups = 0;
        self.duplicate_files = 0;
        for group in index.groups() {
            self.duplicate_groups += 1;
            self.duplicate_files += group.duplicate_count();
        }
        self.scan_duration = started.elapsed();
    }
}

/// Why a search root was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// Nothing exists at the path.
    DoesNotExist,
    /// The path exists but is not a directory.
    NotADirectory,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DoesNotExist => write!(f, "does not exist"),
            Self::NotADirectory => write!(f, "not a directory"),
        }
    }
}

fn bootstrap_detail(source: &Option<std::io::Error>) -> String {
    match source {
        Some(e) => e.to_string(),
        None => "file exists, expected a directory".to_string(),
    }
}

/// Errors that can occur while preparing or running a scan.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The search root is missing or is not a directory.
    #[error("Not a valid search directory {path}: {reason}")]
    InvalidSearchDirectory {
        /// The rejected root
        path: PathBuf,
        /// What is wrong with it
        reason: InvalidReason,
    },

    /// A file could not be read while deriving its content key.
    #[error("Failed to read {path}: {source}")]
    FileReadFailure {
        /// The file being hashed
        path: PathBuf,
        /// The underlying hashing error
        #[source]
        source: HashError,
    },

    /// The application directory could not be prepared.
    #[error("Application directory {path} is unusable: {}", bootstrap_detail(.source))]
    DirectoryBootstrapFailure {
        /// The application directory
        path: PathBuf,
        /// The I/O error, if creation or inspection failed
        #[source]
        source: Option<std::io::Error>,
    },

    /// A walk error, surfaced only in strict mode.
    #[error(transparent)]
    Walk(#[from] ScanError),
}

/// Make sure `path` exists as a directory, creating it (and parents) if absent.
///
/// # Errors
///
/// Returns [`FinderError::DirectoryBootstrapFailure`] if something other than
/// a directory already exists at `path`, or if creation fails.
pub fn ensure_app_dir(path: &Path) -> Result<(), FinderError> {
    let failure = |source| FinderError::DirectoryBootstrapFailure {
        path: path.to_path_buf(),
        source,
    };

    match fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(failure(None)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            fs::create_dir_all(path).map_err(|e| failure(Some(e)))?;
            log::debug!("Created application directory {}", path.display());
            Ok(())
        }
        Err(e) => Err(failure(Some(e))),
    }
}

/// Check that `root` exists and is a directory.
///
/// # Errors
///
/// [`FinderError::InvalidSearchDirectory`] when missing or not a directory;
/// [`FinderError::Walk`] when the root cannot be inspected at all.
pub fn validate_search_dir(root: &Path) -> Result<(), FinderError> {
    let invalid = |reason| FinderError::InvalidSearchDirectory {
        path: root.to_path_buf(),
        reason,
    };

    match fs::metadata(root) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(invalid(InvalidReason::NotADirectory)),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(invalid(InvalidReason::DoesNotExist)),
        Err(e) => Err(FinderError::Walk(ScanError::from_io(root, e))),
    }
}

/// Orchestrates a scan and owns nothing between scans except configuration.
pub struct DuplicateFinder {
    app_dir: PathBuf,
    config: FinderConfig,
}

impl fmt::Debug for DuplicateFinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DuplicateFinder")
            .field("app_dir", &self.app_dir)
            .field("config", &self.config)
            .finish()
    }
}

impl DuplicateFinder {
    /// Create a finder, bootstrapping the application directory first.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::DirectoryBootstrapFailure`] if `app_dir` cannot
    /// be used as a directory.
    pub fn new(app_dir: impl Into<PathBuf>, config: FinderConfig) -> Result<Self, FinderError> {
        let app_dir = app_dir.into();
        ensure_app_dir(&app_dir)?;
        Ok(Self { app_dir, config })
    }

    /// The application directory this finder was created with.
    #[must_use]
    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// The active comparison strategy.
    #[must_use]
    pub fn search_style(&self) -> SearchStyle {
        self.config.search_style
    }

    /// Switch the comparison strategy for subsequent scans.
    pub fn set_search_style(&mut self, style: SearchStyle) {
        self.config.search_style = style;
    }

    /// Scan `root` and return the populated index with summary statistics.
    ///
    /// # Errors
    ///
    /// - [`FinderError::InvalidSearchDirectory`] before any traversal
    /// - [`FinderError::FileReadFailure`] if a content read fails
    /// - [`FinderError::Walk`] on walk errors in strict mode
    pub fn scan(&self, root: &Path) -> Result<(KeyIndex, ScanSummary), FinderError> {
        let started = Instant::now();
        validate_search_dir(root)?;

        let style = self.config.search_style;
        let hasher = Hasher::new().with_buffer_size(self.config.buffer_size);
        let strategy = style.key_strategy(hasher);
        let walker = Walker::new(root, self.config.walker_config.clone());
        log::info!("Scanning {} by {}", walker.root().display(), style);

        let mut index = KeyIndex::new();
        let mut summary = ScanSummary::default();

        if self.config.size_prefilter && style.reads_contents() {
            self.scan_prefiltered(&walker, strategy.as_ref(), &mut index, &mut summary)?;
        } else {
            self.scan_direct(&walker, strategy.as_ref(), &mut index, &mut summary)?;
        }

        summary.finish(&index, started);
        log::info!(
            "Scan complete: {} files, {} keys, {} duplicate groups in {:.2?}",
            summary.total_files,
            summary.distinct_keys,
            summary.duplicate_groups,
            summary.scan_duration
        );

        Ok((index, summary))
    }

    /// Derive and record keys as the walk yields files.
    fn scan_direct(
        &self,
        walker: &Walker,
        strategy: &dyn KeyStrategy,
        index: &mut KeyIndex,
        summary: &mut ScanSummary,
    ) -> Result<(), FinderError> {
        self.phase_start("scanning", 0);
        for result in walker.walk() {
            if let Some(file) = self.accept(result, summary)? {
                self.report_progress(summary.total_files, &file.path);
                Self::record(strategy, file, index)?;
            }
        }
        self.phase_end("scanning");
        Ok(())
    }

    /// Collect the walk, then hash only files whose size occurs more than once.
    ///
    /// Files are recorded in walk order, so groups and their path order match
    /// an unfiltered content scan.
    fn scan_prefiltered(
        &self,
        walker: &Walker,
        strategy: &dyn KeyStrategy,
        index: &mut KeyIndex,
        summary: &mut ScanSummary,
    ) -> Result<(), FinderError> {
        self.phase_start("walking", 0);
        let mut files = Vec::new();
        for result in walker.walk() {
            if let Some(file) = self.accept(result, summary)? {
                self.report_progress(summary.total_files, &file.path);
                files.push(file);
            }
        }
        self.phase_end("walking");

        let mut size_counts: HashMap<u64, usize> = HashMap::new();
        for file in &files {
            *size_counts.entry(file.size).or_default() += 1;
        }

        let candidates: Vec<FileEntry> = files
            .into_iter()
            .filter(|file| size_counts.get(&file.size).copied().unwrap_or(0) > 1)
            .collect();
        summary.skipped_unique_size = summary.total_files - candidates.len();
        log::debug!(
            "Size prefilter: hashing {} of {} files",
            candidates.len(),
            summary.total_files
        );

        self.phase_start("hashing", candidates.len());
        self.report_message(&format!(
            "unique-size files skipped: {}",
            summary.skipped_unique_size
        ));
        for (i, file) in candidates.into_iter().enumerate() {
            self.report_progress(i + 1, &file.path);
            Self::record(strategy, file, index)?;
        }
        self.phase_end("hashing");
        Ok(())
    }

    /// Turn a walker result into a file to record, or skip/abort on error.
    fn accept(
        &self,
        result: Result<FileEntry, ScanError>,
        summary: &mut ScanSummary,
    ) -> Result<Option<FileEntry>, FinderError> {
        match result {
            Ok(file) => {
                summary.total_files += 1;
                Ok(Some(file))
            }
            Err(e) if self.config.strict => Err(FinderError::Walk(e)),
            Err(e) => {
                log::warn!("Skipping: {}", e);
                summary.walk_errors += 1;
                Ok(None)
            }
        }
    }

    fn record(
        strategy: &dyn KeyStrategy,
        file: FileEntry,
        index: &mut KeyIndex,
    ) -> Result<(), FinderError> {
        let key = strategy
            .derive_key(&file)
            .map_err(|source| FinderError::FileReadFailure {
                path: file.path.clone(),
                source,
            })?;
        log::trace!("{} -> {}", file.path.display(), key);
        index.add(key, file.path);
        Ok(())
    }

    fn phase_start(&self, phase: &str, total: usize) {
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start(phase, total);
        }
    }

    fn report_progress(&self, current: usize, path: &Path) {
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_progress(current, path.to_string_lossy().as_ref());
        }
    }

    fn report_message(&self, message: &str) {
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_message(message);
        }
    }

    fn phase_end(&self, phase: &str) {
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end(phase);
        }
    }
}
