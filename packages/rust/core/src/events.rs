//! Progress-event emission.
//!
//! The pipeline pushes each [`OutreachEvent`] into an [`EventSink`] the
//! moment it is computed, so a boundary layer (CLI stdout, an HTTP
//! response stream) can forward partial results before the run completes.
//! The stream is single-pass and never buffered here.

use std::sync::Mutex;

use devreach_shared::OutreachEvent;

/// Receives pipeline events as they happen.
pub trait EventSink: Send + Sync {
    /// Called once per event, in emission order.
    fn emit(&self, event: OutreachEvent);
}

/// No-op sink for headless usage.
pub struct SilentSink;

impl EventSink for SilentSink {
    fn emit(&self, _event: OutreachEvent) {}
}

/// Buffers events in memory; used by tests and summary-only callers.
#[derive(Default)]
pub struct CollectingSink {
    events: Mutex<Vec<OutreachEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far, in order.
    pub fn events(&self) -> Vec<OutreachEvent> {
        self.events.lock().expect("sink lock poisoned").clone()
    }
}

impl EventSink for CollectingSink {
    fn emit(&self, event: OutreachEvent) {
        self.events.lock().expect("sink lock poisoned").push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_preserves_order() {
        let sink = CollectingSink::new();
        sink.emit(OutreachEvent::status("one"));
        sink.emit(OutreachEvent::warning("two"));
        sink.emit(OutreachEvent::status("three"));

        let events = sink.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], OutreachEvent::status("one"));
        assert_eq!(events[2], OutreachEvent::status("three"));
    }
}
