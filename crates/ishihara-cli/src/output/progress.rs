//! Download progress bar using indicatif.

use indicatif::{ProgressBar, ProgressStyle};

/// Byte-level progress for model downloads.
pub struct DownloadProgress {
    bar: Option<ProgressBar>,
}

impl DownloadProgress {
    /// Creates a progress bar labelled `name`. Nothing is drawn when `quiet`.
    #[must_use]
    pub fn new(name: &str, quiet: bool) -> Self {
        if quiet {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta}) {msg}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        bar.set_message(name.to_string());

        Self { bar: Some(bar) }
    }

    /// Records `done` bytes received out of `total`, when known.
    pub fn update(&self, done: u64, total: Option<u64>) {
        if let Some(bar) = &self.bar {
            if let Some(t) = total {
                if bar.length() != Some(t) {
                    bar.set_length(t);
                }
            }
            bar.set_position(done);
        }
    }

    /// Finishes the bar with `message`.
    pub fn finish(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(message.to_string());
        }
    }
}
