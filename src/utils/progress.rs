//! Scan progress spinner that becomes a no-op when the `progress` feature is
//! disabled or the caller asked for a quiet scan.

use std::time::Duration;

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

#[cfg(not(feature = "progress"))]
use self::noop::{ProgressBar, ProgressStyle};

/// Number of files between spinner message refreshes.
const REFRESH_EVERY: usize = 100;

/// Spinner shown while a directory is walked and indexed.
pub struct ScanProgress {
    spinner: Option<ProgressBar>,
}

impl ScanProgress {
    pub fn new(enabled: bool) -> Self {
        let spinner = enabled.then(|| {
            let spinner = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
                spinner.set_style(style);
            }
            spinner.set_message("Discovering files...");
            spinner.enable_steady_tick(Duration::from_millis(80));
            spinner
        });
        Self { spinner }
    }

    /// Report the running count of discovered files.
    pub fn files_found(&self, count: usize) {
        if count % REFRESH_EVERY == 0 {
            self.phase(format!("{} files found", count));
        }
    }

    pub fn phase(&self, msg: impl Into<String>) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(msg.into());
        }
    }

    pub fn finish(&self, msg: impl Into<String>) {
        if let Some(ref spinner) = self.spinner {
            spinner.finish_with_message(msg.into());
        }
    }

    pub fn abandon(&self) {
        if let Some(ref spinner) = self.spinner {
            spinner.finish_and_clear();
        }
    }
}

#[cfg(not(feature = "progress"))]
mod noop {
    use std::time::Duration;

    pub struct ProgressBar;

    impl ProgressBar {
        pub fn new_spinner() -> Self {
            ProgressBar
        }

        pub fn set_style(&self, _style: ProgressStyle) {}
        pub fn set_message(&self, _msg: impl Into<String>) {}
        pub fn enable_steady_tick(&self, _interval: Duration) {}
        pub fn finish_with_message(&self, _msg: impl Into<String>) {}
        pub fn finish_and_clear(&self) {}
    }

    pub struct ProgressStyle;

    impl ProgressStyle {
        pub fn default_spinner() -> Self {
            ProgressStyle
        }

        pub fn template(self, _template: &str) -> Result<Self, std::convert::Infallible> {
            Ok(self)
        }
    }
}
