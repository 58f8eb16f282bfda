//! Output formatters for scan results.
//!
//! Every formatter reads the duplicate groups straight from a [`KeyIndex`]:
//! - [`text`] for people
//! - [`json`] for automation and scripting
//! - [`csv`] for spreadsheet import
//!
//! # Example
//!
//! ```no_run
//! use dupscan::duplicates::{DuplicateFinder, FinderConfig};
//! use dupscan::error::ExitCode;
//! use dupscan::output::JsonOutput;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new("/tmp/dupscan", FinderConfig::default()).unwrap();
//! let (index, summary) = finder.scan(Path::new(".")).unwrap();
//!
//! let output = JsonOutput::new(&index, &summary, finder.search_style(), ExitCode::Success);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```
//!
//! [`KeyIndex`]: crate::duplicates::KeyIndex

pub mod csv;
pub mod json;
pub mod text;

pub use csv::CsvOutput;
pub use json::JsonOutput;
pub use text::TextOutput;
