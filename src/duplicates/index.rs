//! In-memory key index.
//!
//! # Overview
//!
//! [`KeyIndex`] maps a comparison key to the ordered list of paths observed
//! under that key during one scan. It is append-only: paths are added in
//! walk-visitation order and never removed. Keys are remembered in the order
//! they were first inserted, so [`KeyIndex::groups`] yields duplicate groups
//! in a stable order that follows the walk.
//!
//! # Example
//!
//! ```
//! use dupscan::duplicates::KeyIndex;
//!
//! let mut index = KeyIndex::new();
//! index.add("4", "/data/a");
//! index.add("9", "/data/b");
//! index.add("4", "/data/c");
//!
//! let groups: Vec<_> = index.groups().collect();
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].key, "4");
//! assert_eq!(groups[0].len(), 2);
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

/// A key shared by two or more paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateGroup<'a> {
    /// The comparison key
    pub key: &'a str,
    /// Paths sharing the key, in walk order
    pub paths: &'a [PathBuf],
}

impl DuplicateGroup<'_> {
    /// Number of paths in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Always false for groups produced by [`KeyIndex::groups`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Number of redundant copies (all but the first path).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }
}

/// Mapping from comparison key to the paths observed under it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyIndex {
    /// Position of each key in `entries`
    positions: HashMap<String, usize>,
    /// Keys with their paths, in first-insertion order
    entries: Vec<(String, Vec<PathBuf>)>,
}

impl KeyIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `path` under `key`, creating the key if it is new.
    pub fn add(&mut self, key: impl Into<String>, path: impl Into<PathBuf>) {
        let key = key.into();
        let path = path.into();

        if let Some(&pos) = self.positions.get(&key) {
            self.entries[pos].1.push(path);
        } else {
            self.positions.insert(key.clone(), self.entries.len());
            self.entries.push((key, vec![path]));
        }
    }

    /// Keys with two or more paths, in first-insertion order of the key.
    ///
    /// The iterator is lazy and borrows the index; call `groups()` again to
    /// restart it.
    pub fn groups(&self) -> impl Iterator<Item = DuplicateGroup<'_>> + '_ {
        self.iter().filter(|group| group.len() >= 2)
    }

    /// Every key with its paths, in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = DuplicateGroup<'_>> + '_ {
        self.entries.iter().map(|(key, paths)| DuplicateGroup {
            key: key.as_str(),
            paths: paths.as_slice(),
        })
    }

    /// Paths recorded under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[PathBuf]> {
        self.positions
            .get(key)
            .map(|&pos| self.entries[pos].1.as_slice())
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been added yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of paths across all keys.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.entries.iter().map(|(_, paths)| paths.len()).sum()
    }

    /// Number of keys shared by two or more paths.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups().count()
    }
}
