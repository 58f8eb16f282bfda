//! Human-readable output formatter.
//!
//! ```text
//! 2 files of 4 B (4 bytes):
//!   /data/a.txt
//!   /data/b.txt
//!
//! Found 1 duplicate group (1 redundant file) among 3 files in 2ms
//! ```

use std::fmt;
use std::io::{self, Write};

use bytesize::ByteSize;

use crate::duplicates::{DuplicateGroup, KeyIndex, ScanSummary, SearchStyle};

/// Plain-text output formatter.
pub struct TextOutput<'a> {
    index: &'a KeyIndex,
    summary: &'a ScanSummary,
    search_style: SearchStyle,
}

impl<'a> TextOutput<'a> {
    /// Create a new text formatter.
    #[must_use]
    pub fn new(index: &'a KeyIndex, summary: &'a ScanSummary, search_style: SearchStyle) -> Self {
        Self {
            index,
            summary,
            search_style,
        }
    }

    fn heading(&self, group: &DuplicateGroup<'_>) -> String {
        match self.search_style {
            SearchStyle::BySize => match group.key.parse::<u64>() {
                Ok(bytes) => format!(
                    "{} files of {} ({} bytes):",
                    group.len(),
                    ByteSize::b(bytes),
                    bytes
                ),
                Err(_) => format!("{} files with key {}:", group.len(), group.key),
            },
            SearchStyle::ByContents => {
                format!("{} files with SHA-1 {}:", group.len(), group.key)
            }
        }
    }

    /// Write all groups followed by a one-line summary.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        write!(writer, "{self}")
    }
}

impl fmt::Display for TextOutput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for group in self.index.groups() {
            writeln!(f, "{}", self.heading(&group))?;
            for path in group.paths {
                writeln!(f, "  {}", path.display())?;
            }
            writeln!(f)?;
        }

        let summary = self.summary;
        if summary.duplicate_groups == 0 {
            writeln!(
                f,
                "No duplicates found among {} files in {:.2?}",
                summary.total_files, summary.scan_duration
            )?;
        } else {
            writeln!(
                f,
                "Found {} duplicate group{} ({} redundant file{}) among {} files in {:.2?}",
                summary.duplicate_groups,
                plural(summary.duplicate_groups),
                summary.duplicate_files,
                plural(summary.duplicate_files),
                summary.total_files,
                summary.scan_duration
            )?;
        }
        if summary.walk_errors > 0 {
            writeln!(
                f,
                "{} path{} could not be read and were skipped",
                summary.walk_errors,
                plural(summary.walk_errors)
            )?;
        }
        Ok(())
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
