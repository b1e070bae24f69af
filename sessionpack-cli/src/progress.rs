//! Terminal progress bar for export jobs.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use sessionpack_export::ProgressMonitor;

const STEPS: u64 = 100;
const TEMPLATE: &str = "{spinner:.green} {prefix} [{bar:40.cyan/blue}] {percent}% {msg}";

/// An `indicatif` bar fed by an export job.
pub struct ExportProgress {
    bar: ProgressBar,
}

impl ExportProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(STEPS);
        if let Ok(style) = ProgressStyle::default_bar().template(TEMPLATE) {
            bar.set_style(style.progress_chars("█▓▒░"));
        }
        Self { bar }
    }

    /// A bar that draws nothing, for `--quiet`.
    pub fn hidden() -> Self {
        let bar = ProgressBar::with_draw_target(Some(STEPS), ProgressDrawTarget::hidden());
        Self { bar }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ExportProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressMonitor for ExportProgress {
    fn set_title(&self, title: &str) {
        self.bar.set_prefix(title.to_string());
    }

    fn set_status(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    fn set_progress(&self, fraction: f64) {
        let position = (fraction.clamp(0.0, 1.0) * STEPS as f64).round() as u64;
        if position > self.bar.position() {
            self.bar.set_position(position);
        }
    }
}
