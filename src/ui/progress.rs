use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

use super::Style;
use crate::output;
use crate::pipeline::{Progress, ProgressSink};
use crate::translation::display_name;

/// Terminal progress for a translation run.
///
/// Shows a spinner naming the language in flight and, for batches, a bar
/// advanced once per finished file. Clears itself when dropped.
pub struct BatchProgress {
    bar: ProgressBar,
}

impl BatchProgress {
    /// `files` of `1` shows a spinner only.
    #[allow(clippy::unwrap_used)]
    pub fn new(files: usize) -> Self {
        let bar = if files > 1 {
            let bar = ProgressBar::new(files as u64);
            // unwrap is safe: template string is a compile-time constant
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner} [{bar:30}] {pos}/{len} files ({percent}%) {msg}")
                    .unwrap()
                    .progress_chars("=> "),
            );
            bar
        } else {
            let bar = ProgressBar::new_spinner();
            // unwrap is safe: template string is a compile-time constant
            bar.set_style(
                ProgressStyle::default_spinner()
                    .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "])
                    .template("{spinner} {msg}")
                    .unwrap(),
            );
            bar
        };

        if output::is_quiet() {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        } else {
            bar.enable_steady_tick(Duration::from_millis(80));
        }

        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for BatchProgress {
    fn language_started(&self, language: &str) {
        self.bar
            .set_message(format!("Translating into {}...", display_name(language)));
    }

    fn language_finished(&self, language: &str, error: Option<&anyhow::Error>) {
        if let Some(error) = error {
            crate::warn!(
                "{} {} translation failed: {error:#}",
                Style::error("Error:"),
                display_name(language)
            );
        }
    }

    fn file_finished(&self, progress: Progress) {
        self.bar.set_position(progress.completed as u64);
        log::debug!(
            "{}/{} files done ({}%)",
            progress.completed,
            progress.total,
            progress.percent()
        );
    }
}

impl Drop for BatchProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}
