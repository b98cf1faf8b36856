//! Test and helper observers for extract_core

use std::sync::{Arc, Mutex};

use crate::status::{ExtractEvent, ExtractObserver};

/// Observer that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ExtractObserver for NoopObserver {
    fn on_event(&mut self, _event: &ExtractEvent) {}
}

/// Observer that keeps every event; clones share the same buffer so a test can
/// hand one to the workbench and read through the other.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<ExtractEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events seen so far.
    pub fn events(&self) -> Vec<ExtractEvent> {
        self.events.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Remove and return the events seen so far.
    pub fn drain(&self) -> Vec<ExtractEvent> {
        self.events
            .lock()
            .map(|mut g| std::mem::take(&mut *g))
            .unwrap_or_default()
    }
}

impl ExtractObserver for RecordingObserver {
    fn on_event(&mut self, event: &ExtractEvent) {
        if let Ok(mut g) = self.events.lock() {
            g.push(event.clone());
        }
    }
}
