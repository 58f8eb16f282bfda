//! CSV output formatter.
//!
//! One row per file in a duplicate group.
//!
//! # Columns
//!
//! - `group_id`: 1-based group number, in index order
//! - `key`: comparison key (decimal size or hex digest)
//! - `path`: file path as walked

use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::duplicates::KeyIndex;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    group_id: usize,
    key: &'a str,
    path: String,
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    index: &'a KeyIndex,
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(index: &'a KeyIndex) -> Self {
        Self { index }
    }

    /// Write the CSV output to the given writer.
    ///
    /// The header row is always written, even when there are no groups.
    ///
    /// # Errors
    ///
    /// Returns an error if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        wtr.write_record(["group_id", "key", "path"])?;

        for (i, group) in self.index.groups().enumerate() {
            for path in group.paths {
                wtr.serialize(CsvRow {
                    group_id: i + 1,
                    key: group.key,
                    path: path.to_string_lossy().into_owned(),
                })?;
            }
        }

        wtr.flush()?;
        Ok(())
    }

    /// Render the CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
