//! JSON output formatter.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "search_style": "contents",
//!   "groups": [
//!     {
//!       "key": "a94a8fe5ccb19ba61c4c0873d391e987982fbbd3",
//!       "files": ["/path/a", "/path/b"]
//!     }
//!   ],
//!   "summary": {
//!     "total_files": 3,
//!     "indexed_files": 3,
//!     "skipped_unique_size": 0,
//!     "distinct_keys": 2,
//!     "duplicate_groups": 1,
//!     "duplicate_files": 1,
//!     "walk_errors": 0,
//!     "scan_duration_ms": 4,
//!     "exit_code": 0,
//!     "exit_code_name": "DS000"
//!   }
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use crate::duplicates::{DuplicateGroup, KeyIndex, ScanSummary, SearchStyle};
use crate::error::ExitCode;

/// A single duplicate group.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// Comparison key (decimal size or hex digest)
    pub key: String,
    /// Paths sharing the key, in walk order
    pub files: Vec<String>,
}

impl From<DuplicateGroup<'_>> for JsonDuplicateGroup {
    fn from(group: DuplicateGroup<'_>) -> Self {
        Self {
            key: group.key.to_string(),
            files: group
                .paths
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
        }
    }
}

/// Summary statistics.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Regular files found by the walk
    pub total_files: usize,
    /// Files recorded in the index
    pub indexed_files: usize,
    /// Files not hashed because of a unique size
    pub skipped_unique_size: usize,
    /// Distinct keys
    pub distinct_keys: usize,
    /// Keys shared by two or more files
    pub duplicate_groups: usize,
    /// Redundant copies across all groups
    pub duplicate_files: usize,
    /// Walk errors skipped
    pub walk_errors: usize,
    /// Scan duration in milliseconds
    pub scan_duration_ms: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Build from a scan summary and exit code.
    #[must_use]
    pub fn from_scan_summary(summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            total_files: summary.total_files,
            indexed_files: summary.indexed_files,
            skipped_unique_size: summary.skipped_unique_size,
            distinct_keys: summary.distinct_keys,
            duplicate_groups: summary.duplicate_groups,
            duplicate_files: summary.duplicate_files,
            walk_errors: summary.walk_errors,
            scan_duration_ms: u64::try_from(summary.scan_duration.as_millis()).unwrap_or(u64::MAX),
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Complete JSON document.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Strategy used to derive keys
    pub search_style: SearchStyle,
    /// Duplicate groups
    pub groups: Vec<JsonDuplicateGroup>,
    /// Scan statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Build the JSON document from a scan result.
    ///
    /// ```
    /// use dupscan::duplicates::{KeyIndex, ScanSummary, SearchStyle};
    /// use dupscan::error::ExitCode;
    /// use dupscan::output::JsonOutput;
    ///
    /// let mut index = KeyIndex::new();
    /// index.add("7", "/a");
    /// index.add("7", "/b");
    ///
    /// let output = JsonOutput::new(&index, &ScanSummary::default(), SearchStyle::BySize, ExitCode::Success);
    /// assert_eq!(output.groups.len(), 1);
    /// ```
    #[must_use]
    pub fn new(
        index: &KeyIndex,
        summary: &ScanSummary,
        search_style: SearchStyle,
        exit_code: ExitCode,
    ) -> Self {
        Self {
            search_style,
            groups: index.groups().map(JsonDuplicateGroup::from).collect(),
            summary: JsonSummary::from_scan_summary(summary, exit_code),
        }
    }

    /// Serialize to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)
    }
}
