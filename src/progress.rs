//! Progress reporting using indicatif.
//!
//! [`Progress`] implements [`ProgressCallback`] and draws on stderr, so it
//! never interferes with JSON or CSV written to stdout.

use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress callback for scan phases.
///
/// Phases used by the finder: `"scanning"` (walk and key derivation in one
/// pass), or `"walking"` followed by `"hashing"` when the size prefilter is on.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts. `total` is 0 when the count is unknown.
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for each item processed (`current` is 1-based).
    fn on_progress(&self, current: usize, path: &str);

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);

    /// Called to update the progress message.
    fn on_message(&self, _message: &str) {}
}

/// Terminal progress reporter.
pub struct Progress {
    bar: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter. When `quiet`, nothing is drawn.
    ///
    /// ```
    /// use dupscan::progress::Progress;
    ///
    /// let progress = Progress::new(true);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            quiet,
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} files")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} (ETA: {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(ref pb) = *guard {
                f(pb);
            }
        }
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }

        let pb = if total == 0 {
            let pb = ProgressBar::new_spinner();
            pb.set_style(Self::spinner_style());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        } else {
            let pb = ProgressBar::new(total as u64);
            pb.set_style(Self::bar_style());
            pb
        };
        pb.set_message(phase.to_string());

        if let Ok(mut guard) = self.bar.lock() {
            if let Some(previous) = guard.replace(pb) {
                previous.finish_and_clear();
            }
        }
    }

    fn on_progress(&self, current: usize, path: &str) {
        if self.quiet {
            return;
        }
        self.with_bar(|pb| {
            pb.set_position(current as u64);
            pb.set_message(truncate_path(path, 40));
        });
    }

    fn on_phase_end(&self, phase: &str) {
        if self.quiet {
            return;
        }
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_with_message(format!("{phase} complete"));
            }
        }
    }

    fn on_message(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.with_bar(|pb| pb.set_message(message.to_string()));
    }
}

/// Shorten a path for display, keeping the file name.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len + 4 > max_len {
        let tail: String = file_name
            .chars()
            .skip(name_len.saturating_sub(max_len.saturating_sub(3)))
            .collect();
        return format!("...{tail}");
    }

    format!(".../{file_name}")
}
