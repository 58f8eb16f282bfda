//! Scanner module for directory traversal and file hashing.
//!
//! This module provides the two filesystem collaborators of the duplicate
//! finder:
//! - [`walker`]: Recursive, deterministic discovery of regular files
//! - [`hasher`]: Streaming SHA-1 content digests
//!
//! # Example
//!
//! ```no_run
//! use dupscan::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     skip_hidden: true,
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(Path::new("."), config);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub use hasher::{Hasher, DEFAULT_BUFFER_SIZE, DIGEST_HEX_LEN};
pub use walker::Walker;

/// A regular file discovered during a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path to the file, rooted at the walk root
    pub path: PathBuf,
    /// File size in bytes, as reported by metadata
    pub size: u64,
}

impl FileEntry {
    /// Create a new entry.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkerConfig {
    /// Follow symbolic links during traversal.
    /// Warning: symlink cycles are not detected beyond what `walkdir` reports.
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (names starting with `.`).
    pub skip_hidden: bool,

    /// Minimum file size to include (in bytes).
    pub min_size: Option<u64>,

    /// Maximum file size to include (in bytes).
    pub max_size: Option<u64>,

    /// Glob patterns to ignore (gitignore-style).
    pub ignore_patterns: Vec<String>,

    /// Also apply the `.gitignore` at the walk root. Off by default, so every
    /// file under the root is visited.
    pub respect_gitignore: bool,
}

impl WalkerConfig {
    /// Set whether symbolic links are followed.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Set whether hidden entries are skipped.
    #[must_use]
    pub fn with_skip_hidden(mut self, skip: bool) -> Self {
        self.skip_hidden = skip;
        self
    }

    /// Set the inclusive size bounds.
    #[must_use]
    pub fn with_size_bounds(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.min_size = min;
        self.max_size = max;
        self
    }

    /// Set the ignore patterns.
    #[must_use]
    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    /// Set whether the root `.gitignore` is applied.
    #[must_use]
    pub fn with_respect_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The entry vanished between listing and inspection.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// Any other I/O failure while walking.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Classify an I/O error observed at `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// The path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied(path) | Self::NotFound(path) => path,
            Self::Io { path, .. } => path,
        }
    }
}

/// Errors that can occur while hashing a file.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The file was not found (it may have been removed after listing).
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when opening or reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Classify an I/O error raised while hashing `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}
