//! Progress reporting.
//!
//! [`ProgressCallback`] is the sink the detection pipeline reports into.
//! [`Progress`] implements it with indicatif: a spinner while walking and a
//! bar while comparing. [`DisposeProgress`] draws the bar for a trash run.
//!
//! Phase names used by the pipeline are [`PHASE_WALK`] and
//! [`PHASE_COMPARE`].

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::actions::{DisposeError, DisposeProgressCallback, DisposeReport};
use crate::duplicates::DuplicatePair;

/// Phase name for directory walking.
pub const PHASE_WALK: &str = "walking";
/// Phase name for pairwise content comparison.
pub const PHASE_COMPARE: &str = "comparing";

/// Progress callback for the duplicate detection pipeline.
///
/// Callbacks are invoked from the thread running the scan, in the order
/// events happen.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase ([`PHASE_WALK`] or [`PHASE_COMPARE`])
    /// * `total` - Total number of items to process (0 if unknown)
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for each item processed.
    ///
    /// # Arguments
    ///
    /// * `current` - Cumulative number of items processed in this phase
    /// * `path` - Path of the item just processed
    fn on_progress(&self, current: usize, path: &str);

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);

    /// Called whenever a new duplicate pair is confirmed.
    fn on_pair_found(&self, _pair: &DuplicatePair) {}

    /// Called to update the progress message.
    fn on_message(&self, _message: &str) {}
}

/// Terminal progress reporter using indicatif.
pub struct Progress {
    multi: MultiProgress,
    walking: Mutex<Option<ProgressBar>>,
    comparing: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, nothing is drawn.
    ///
    /// # Examples
    ///
    /// ```
    /// use dupes2trash::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            walking: Mutex::new(None),
            comparing: Mutex::new(None),
            quiet,
        }
    }

    fn walking_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} files")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn comparing_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} (ETA: {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    /// The bar currently receiving updates, comparing first.
    fn with_active_bar(&self, f: impl FnOnce(&ProgressBar)) {
        let comparing = self.comparing.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(ref pb) = *comparing {
            f(pb);
            return;
        }
        drop(comparing);

        let walking = self.walking.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(ref pb) = *walking {
            f(pb);
        }
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }

        match phase {
            PHASE_WALK => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::walking_style());
                pb.set_message("Walking directory");
                pb.enable_steady_tick(Duration::from_millis(100));
                *self.walking.lock().unwrap_or_else(|e| e.into_inner()) = Some(pb);
            }
            PHASE_COMPARE => {
                let pb = self.multi.add(ProgressBar::new(total as u64));
                pb.set_style(Self::comparing_style());
                pb.set_message("Comparing");
                *self.comparing.lock().unwrap_or_else(|e| e.into_inner()) = Some(pb);
            }
            other => log::debug!("Unknown progress phase: {}", other),
        }
    }

    fn on_progress(&self, current: usize, path: &str) {
        if self.quiet {
            return;
        }

        // An empty path only advances the count and keeps the current message.
        let message = (!path.is_empty()).then(|| truncate_path(path, 30));
        self.with_active_bar(|pb| {
            pb.set_position(current as u64);
            if let Some(message) = message {
                pb.set_message(message);
            }
        });
    }

    fn on_phase_end(&self, phase: &str) {
        if self.quiet {
            return;
        }

        match phase {
            PHASE_WALK => {
                if let Some(pb) = self.walking.lock().unwrap_or_else(|e| e.into_inner()).take() {
                    pb.finish_with_message("Walking complete");
                }
            }
            PHASE_COMPARE => {
                if let Some(pb) = self
                    .comparing
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .take()
                {
                    pb.finish_with_message("Comparison complete");
                }
            }
            _ => {}
        }
    }

    fn on_message(&self, message: &str) {
        if self.quiet {
            return;
        }
        let message = message.to_string();
        self.with_active_bar(|pb| pb.set_message(message));
    }
}

/// Progress bar for moving files to the trash.
pub struct DisposeProgress {
    bar: Option<ProgressBar>,
}

impl DisposeProgress {
    /// A bar for `total` files, or nothing at all when `quiet`.
    #[must_use]
    pub fn new(total: usize, quiet: bool) -> Self {
        let bar = (!quiet).then(|| {
            let pb = ProgressBar::new(total as u64);
            pb.set_style(
                ProgressStyle::with_template("[{elapsed_precise}] [{bar:40.yellow/red}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("█>-"),
            );
            pb
        });
        Self { bar }
    }
}

impl DisposeProgressCallback for DisposeProgress {
    fn on_before_dispose(&self, path: &Path, index: usize, _total: usize) {
        if let Some(ref pb) = self.bar {
            pb.set_position(index as u64);
            pb.set_message(truncate_path(&path.to_string_lossy(), 30));
        }
    }

    fn on_moved(&self, _path: &Path, _size: u64) {
        if let Some(ref pb) = self.bar {
            pb.inc(1);
        }
    }

    fn on_skipped(&self, path: &Path, error: &DisposeError) {
        if let Some(ref pb) = self.bar {
            pb.inc(1);
            pb.println(format!("skipped {}: {}", path.display(), error));
        }
    }

    fn on_failed(&self, path: &Path) {
        if let Some(ref pb) = self.bar {
            pb.inc(1);
            pb.println(format!("could not trash {}", path.display()));
        }
    }

    fn on_complete(&self, report: &DisposeReport) {
        if let Some(ref pb) = self.bar {
            if report.interrupted {
                pb.abandon_with_message("interrupted");
            } else {
                pb.finish_and_clear();
            }
        }
    }
}

/// Truncate a path for display in a progress bar.
///
/// Long paths are reduced to their file name, prefixed with `.../`.
#[must_use]
pub fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len + 4 > max_len {
        let keep = max_len.saturating_sub(3);
        let tail: String = file_name.chars().skip(name_len.saturating_sub(keep)).collect();
        return format!("...{tail}");
    }

    format!(".../{file_name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_path_unchanged() {
        assert_eq!(truncate_path("/a/b.txt", 30), "/a/b.txt");
    }

    #[test]
    fn test_truncate_long_path_keeps_file_name() {
        let path = "/very/long/directory/structure/that/goes/on/file.txt";
        assert_eq!(truncate_path(path, 30), ".../file.txt");
    }

    #[test]
    fn test_truncate_long_file_name() {
        let path = format!("/dir/{}", "x".repeat(50));
        let truncated = truncate_path(&path, 20);
        assert!(truncated.starts_with("..."));
        assert_eq!(truncated.chars().count(), 20);
    }

    #[test]
    fn test_quiet_dispose_progress_has_no_bar() {
        let progress = DisposeProgress::new(3, true);
        progress.on_moved(Path::new("/a"), 1);
        progress.on_complete(&DisposeReport::default());
        assert!(progress.bar.is_none());
    }

    #[test]
    fn test_progress_without_path_keeps_message() {
        let progress = Progress::new(false);
        progress.on_phase_start(PHASE_WALK, 0);
        progress.on_message("Walking /photos");
        progress.on_progress(3, "");

        let walking = progress.walking.lock().unwrap();
        let pb = walking.as_ref().unwrap();
        assert_eq!(pb.message(), "Walking /photos");
        assert_eq!(pb.position(), 3);
        drop(walking);

        progress.on_progress(4, "/photos/a.jpg");
        assert_eq!(
            progress.walking.lock().unwrap().as_ref().unwrap().message(),
            "/photos/a.jpg"
        );
        progress.on_phase_end(PHASE_WALK);
    }

    #[test]
    fn test_quiet_progress_ignores_events() {
        let progress = Progress::new(true);
        progress.on_phase_start(PHASE_COMPARE, 10);
        progress.on_progress(1, "/a");
        progress.on_phase_end(PHASE_COMPARE);
        assert!(progress.comparing.lock().unwrap().is_none());
    }
}
