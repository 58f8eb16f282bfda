//! Comparison-key strategies.
//!
//! A [`SearchStyle`] is chosen once per scan and turned into a
//! [`KeyStrategy`] trait object; the scan loop then derives keys without
//! branching on the style for every file.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::scanner::{FileEntry, HashError, Hasher};

/// How files are compared.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
pub enum SearchStyle {
    /// Group by byte length (fast, candidates only)
    #[default]
    #[serde(rename = "size")]
    #[value(name = "size")]
    BySize,
    /// Group by SHA-1 of the full contents (confirmed duplicates)
    #[serde(rename = "contents")]
    #[value(name = "contents")]
    ByContents,
}

impl SearchStyle {
    /// Build the key strategy for this style.
    ///
    /// `hasher` is only retained by [`SearchStyle::ByContents`].
    #[must_use]
    pub fn key_strategy(self, hasher: Hasher) -> Box<dyn KeyStrategy> {
        match self {
            Self::BySize => Box::new(SizeKey),
            Self::ByContents => Box::new(ContentKey::new(hasher)),
        }
    }

    /// Whether deriving a key reads file contents.
    #[must_use]
    pub fn reads_contents(self) -> bool {
        matches!(self, Self::ByContents)
    }
}

impl fmt::Display for SearchStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BySize => write!(f, "size"),
            Self::ByContents => write!(f, "contents"),
        }
    }
}

/// Derives the comparison key for a discovered file.
pub trait KeyStrategy {
    /// Compute the key for `file`.
    ///
    /// # Errors
    ///
    /// Content-based strategies fail when the file cannot be read.
    fn derive_key(&self, file: &FileEntry) -> Result<String, HashError>;
}

/// Key is the decimal byte length taken from metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct SizeKey;

impl KeyStrategy for SizeKey {
    fn derive_key(&self, file: &FileEntry) -> Result<String, HashError> {
        Ok(file.size.to_string())
    }
}

/// Key is the hex SHA-1 digest of the file's contents.
#[derive(Debug, Clone, Default)]
pub struct ContentKey {
    hasher: Hasher,
}

impl ContentKey {
    /// Create a content strategy backed by `hasher`.
    #[must_use]
    pub fn new(hasher: Hasher) -> Self {
        Self { hasher }
    }
}

impl KeyStrategy for ContentKey {
    fn derive_key(&self, file: &FileEntry) -> Result<String, HashError> {
        self.hasher.hash_file(&file.path)
    }
}
