//! Progress reporting seam between an export job and its host.

/// Receives progress from a running export job.
///
/// Progress fractions are in `[0, 1]` and never decrease within one job.
pub trait ProgressMonitor {
    fn set_title(&self, _title: &str) {}

    fn set_status(&self, _message: &str) {}

    fn set_progress(&self, _fraction: f64) {}
}

/// Monitor that discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMonitor;

impl ProgressMonitor for NullMonitor {}
