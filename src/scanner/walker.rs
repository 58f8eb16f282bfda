//! Directory walker built on `walkdir`.
//!
//! # Overview
//!
//! [`Walker`] visits a directory tree depth-first, one entry at a time, with
//! the children of each directory sorted by file name. The order is stable
//! across runs on the same tree, which is what gives the key index its
//! insertion-order guarantees.
//!
//! Directories are traversed but never yielded. Symlinks are skipped unless
//! `follow_symlinks` is set. Errors for individual entries are yielded as
//! [`ScanError`] values and do not stop the walk.

use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use walkdir::{DirEntry, WalkDir};

use super::{FileEntry, ScanError, WalkerConfig};

/// Sequential directory walker.
#[derive(Debug)]
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker rooted at `path`.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// Root directory of this walk.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Build the ignore matcher from configured patterns and, when enabled,
    /// the root `.gitignore`.
    fn build_gitignore(&self) -> Option<Gitignore> {
        let mut builder = GitignoreBuilder::new(&self.root);

        let gitignore_path = self.root.join(".gitignore");
        if self.config.respect_gitignore && gitignore_path.is_file() {
            if let Some(e) = builder.add(&gitignore_path) {
                log::warn!(
                    "Failed to load .gitignore from {}: {}",
                    gitignore_path.display(),
                    e
                );
            } else {
                log::debug!("Loaded .gitignore from {}", gitignore_path.display());
            }
        }

        for pattern in &self.config.ignore_patterns {
            if let Err(e) = builder.add_line(None, pattern) {
                log::warn!("Invalid ignore pattern '{}': {}", pattern, e);
            }
        }

        match builder.build() {
            Ok(gitignore) if gitignore.is_empty() => None,
            Ok(gitignore) => Some(gitignore),
            Err(e) => {
                log::warn!("Failed to build ignore patterns: {}", e);
                None
            }
        }
    }

    fn should_ignore(&self, path: &Path, is_dir: bool, gitignore: Option<&Gitignore>) -> bool {
        let Some(gi) = gitignore else {
            return false;
        };

        // Matching is done on root-relative, forward-slash paths.
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let relative = relative.to_string_lossy();
        let normalized = if cfg!(windows) {
            relative.replace('\\', "/")
        } else {
            relative.into_owned()
        };

        gi.matched(normalized, is_dir).is_ignore()
    }

    fn is_hidden(entry: &DirEntry) -> bool {
        entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
    }

    /// Decide whether an entry (and, for directories, its subtree) is visited.
    fn keep_entry(&self, entry: &DirEntry, gitignore: Option<&Gitignore>) -> bool {
        if entry.depth() == 0 {
            return true;
        }
        if self.config.skip_hidden && Self::is_hidden(entry) {
            log::trace!("Skipping hidden entry: {}", entry.path().display());
            return false;
        }
        if self.should_ignore(entry.path(), entry.file_type().is_dir(), gitignore) {
            log::trace!("Ignoring: {}", entry.path().display());
            return false;
        }
        true
    }

    fn passes_size_filter(&self, size: u64) -> bool {
        if self.config.min_size.is_some_and(|min| size < min) {
            return false;
        }
        if self.config.max_size.is_some_and(|max| size > max) {
            return false;
        }
        true
    }

    /// Walk the tree, yielding regular files in visitation order.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupscan::scanner::{Walker, WalkerConfig};
    /// use std::path::Path;
    ///
    /// let walker = Walker::new(Path::new("."), WalkerConfig::default());
    /// let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
    /// println!("Found {} files", files.len());
    /// ```
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        let gitignore = self.build_gitignore();

        WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
            .into_iter()
            .filter_entry(move |entry| self.keep_entry(entry, gitignore.as_ref()))
            .filter_map(move |result| match result {
                Ok(entry) => self.process_entry(entry),
                Err(e) => Some(Err(self.handle_walk_error(e))),
            })
    }

    fn process_entry(&self, entry: DirEntry) -> Option<Result<FileEntry, ScanError>> {
        let file_type = entry.file_type();
        if file_type.is_dir() {
            return None;
        }

        // Without follow_links, walkdir reports the link itself.
        if file_type.is_symlink() {
            log::trace!("Skipping symlink: {}", entry.path().display());
            return None;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => return Some(Err(self.handle_walk_error(e))),
        };

        if !metadata.is_file() {
            log::trace!("Skipping non-regular file: {}", entry.path().display());
            return None;
        }

        let size = metadata.len();
        if !self.passes_size_filter(size) {
            log::trace!(
                "Skipping file due to size filter ({}): {}",
                size,
                entry.path().display()
            );
            return None;
        }

        Some(Ok(FileEntry::new(entry.into_path(), size)))
    }

    fn handle_walk_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);
        log::debug!("Walker error for {}: {}", path.display(), error);
        ScanError::from_io(&path, error.into())
    }
}
