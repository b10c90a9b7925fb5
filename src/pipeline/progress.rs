//! Progress reporting from a running job to its caller.

use std::sync::{Mutex, PoisonError};

/// Receives `(status, percent)` updates at chunk boundaries.
///
/// The job only emits; rendering belongs to the caller (CLI bar, UI, logs).
pub trait ProgressSink: Send + Sync {
    fn report(&self, status: &str, percent: u8);
}

/// Sink that discards all updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn report(&self, _status: &str, _percent: u8) {}
}

/// Sink that records updates, for tests and buffered consumers.
#[derive(Debug, Default)]
pub struct CollectingProgress {
    updates: Mutex<Vec<(String, u8)>>,
}

impl CollectingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<(String, u8)> {
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ProgressSink for CollectingProgress {
    fn report(&self, status: &str, percent: u8) {
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((status.to_string(), percent));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_keeps_updates_in_order() {
        let sink = CollectingProgress::new();
        sink.report("normalizing", 0);
        sink.report("part 1/2", 0);
        sink.report("part 2/2", 50);
        sink.report("done", 100);

        let updates = sink.updates();
        assert_eq!(updates.len(), 4);
        assert_eq!(updates[0], ("normalizing".to_string(), 0));
        assert_eq!(updates[3], ("done".to_string(), 100));
    }

    #[test]
    fn noop_sink_accepts_updates() {
        NoopProgress.report("anything", 42);
    }
}
