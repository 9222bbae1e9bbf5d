//! Progress indicators for long-running server operations.
//!
//! Spinners are disabled when `SASB_NO_PROGRESS` is set (CI, scripts,
//! non-ANSI terminals); callers don't need to care either way.

use crate::constants::ENV_NO_PROGRESS;
use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};
use std::time::Duration;

fn is_progress_disabled() -> bool {
    std::env::var(ENV_NO_PROGRESS).is_ok()
}

/// A spinner for indeterminate work (job submission, server polling).
pub struct Spinner {
    bar: IndicatifBar,
}

impl Spinner {
    /// Create and start a spinner with the given message.
    ///
    /// Returns a hidden spinner when progress output is disabled.
    pub fn start(message: impl Into<String>) -> Self {
        let bar = if is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner} {msg}").expect("valid spinner template"),
            );
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        bar.set_message(message.into());
        Self { bar }
    }

    /// Stop the spinner and erase it from the terminal.
    pub fn stop(&self) {
        self.bar.finish_and_clear();
    }
}
