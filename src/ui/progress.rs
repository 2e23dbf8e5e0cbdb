use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::engine::{BatchObserver, BatchPosition, BatchReport};

/// Progress bar over the strings of a run, advanced once per saved batch.
///
/// Cloning shares the bar, so prompts can hide it while they are shown.
#[derive(Clone)]
pub struct BatchProgress {
    progress_bar: ProgressBar,
}

impl BatchProgress {
    /// Creates a bar over `total` strings. Hidden in quiet mode.
    #[allow(clippy::unwrap_used)]
    pub fn new(total: usize) -> Self {
        if crate::output::is_quiet() {
            return Self::hidden();
        }

        let progress_bar = ProgressBar::new(total as u64);
        // unwrap is safe: template string is a compile-time constant
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner} [{bar:30}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("=> "),
        );
        progress_bar.enable_steady_tick(Duration::from_millis(120));

        Self { progress_bar }
    }

    pub fn hidden() -> Self {
        Self {
            progress_bar: ProgressBar::hidden(),
        }
    }

    /// Runs `f` with the bar cleared from the terminal.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.progress_bar.suspend(f)
    }

    pub fn finish(&self) {
        self.progress_bar.finish_and_clear();
    }
}

impl BatchObserver for BatchProgress {
    fn batch_started(&self, batch: BatchPosition, size: usize) {
        self.progress_bar
            .set_message(format!("batch {batch} ({size} strings)"));
    }

    fn batch_finished(&self, _batch: BatchPosition, report: &BatchReport) {
        let done = report.translated + report.skipped_empty;
        self.progress_bar.set_position(done as u64);
    }

    fn waiting(&self, delay: Duration) {
        self.progress_bar
            .set_message(format!("rate limited, waiting {}s", delay.as_secs()));
    }
}
