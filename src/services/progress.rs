//! Progress reporting for long-running plans.
//!
//! The planner reports a percentage and a short message at each step.
//! Closures taking `(u8, &str)` work as reporters.

/// Receives coarse progress updates while a trip is planned.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, percent: u8, message: &str);
}

/// Discards progress updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _percent: u8, _message: &str) {}
}

/// Logs progress at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report(&self, percent: u8, message: &str) {
        tracing::debug!(percent, "{}", message);
    }
}

impl<F> ProgressReporter for F
where
    F: Fn(u8, &str) + Send + Sync,
{
    fn report(&self, percent: u8, message: &str) {
        self(percent, message)
    }
}
