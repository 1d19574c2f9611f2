//! Built-in progress observers

use scriptmind_domain::ProgressObserver;
use tracing::info;

/// Observer that ignores every milestone
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn report(&self, _message: &str, _percent: u8) {}
}

/// Observer that logs milestones at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressObserver for TracingProgress {
    fn report(&self, message: &str, percent: u8) {
        info!(percent, "{}", message);
    }
}
