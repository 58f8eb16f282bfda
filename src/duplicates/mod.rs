//! Duplicate detection module.
//!
//! This module provides:
//! - [`index`]: The append-only key index and its duplicate-group view
//! - [`strategy`]: Size and content key derivation
//! - [`finder`]: The scan orchestrator

pub mod finder;
pub mod index;
pub mod strategy;

pub use finder::{
    ensure_app_dir, validate_search_dir, DuplicateFinder, FinderConfig, FinderError,
    InvalidReason, ScanSummary,
};
pub use index::{DuplicateGroup, KeyIndex};
pub use strategy::{ContentKey, KeyStrategy, SearchStyle, SizeKey};
