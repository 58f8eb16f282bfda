//! Streaming SHA-1 file hasher.
//!
//! Content keys are the 40-character lowercase hex form of the SHA-1
//! digest. Files are read through a fixed-size buffer so memory use does
//! not depend on file size, and each file handle is dropped before
//! [`Hasher::hash_file`] returns.

use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::Path;

use sha1::{Digest, Sha1};

use super::HashError;

/// Default read buffer size (64 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Length of a hex-encoded digest.
pub const DIGEST_HEX_LEN: usize = 40;

/// SHA-1 hasher for file contents.
#[derive(Debug, Clone)]
pub struct Hasher {
    buffer_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default buffer size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Use a custom read buffer size (clamped to at least one byte).
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Current read buffer size.
    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Hash the full contents of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read to the end.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupscan::scanner::Hasher;
    /// use std::path::Path;
    ///
    /// let digest = Hasher::new().hash_file(Path::new("Cargo.toml")).unwrap();
    /// assert_eq!(digest.len(), 40);
    /// ```
    pub fn hash_file(&self, path: &Path) -> Result<String, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        self.hash_reader(file)
            .map_err(|e| HashError::from_io(path, e))
    }

    /// Hash everything readable from `reader`.
    ///
    /// # Errors
    ///
    /// Propagates the first non-`Interrupted` read error.
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> io::Result<String> {
        let mut hasher = Sha1::new();
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => hasher.update(&buffer[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Hash an in-memory byte slice.
    #[must_use]
    pub fn hash_bytes(data: &[u8]) -> String {
        format!("{:x}", Sha1::digest(data))
    }
}
