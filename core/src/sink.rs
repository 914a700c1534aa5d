//! Telemetry sinks: where finished slot events are handed off.

use std::cell::RefCell;

use serde_json::Value;

use crate::events::Attributes;

/// Receiver for named telemetry events. Submission means "accepted for
/// delivery"; transport and retries are the sink's business.
pub trait TelemetrySink {
    fn submit(&self, event_name: &str, attributes: Attributes);
}

/// One event captured by a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    pub name: String,
    pub attributes: Attributes,
}

impl RecordedEvent {
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}

/// Keeps every submitted event in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: RefCell<Vec<RecordedEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.borrow().clone()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<RecordedEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn count(&self, name: &str) -> usize {
        self.events.borrow().iter().filter(|e| e.name == name).count()
    }

    pub fn last(&self) -> Option<RecordedEvent> {
        self.events.borrow().last().cloned()
    }
}

impl TelemetrySink for RecordingSink {
    fn submit(&self, event_name: &str, attributes: Attributes) {
        self.events.borrow_mut().push(RecordedEvent {
            name: event_name.to_string(),
            attributes,
        });
    }
}

/// Writes every event to the `tracing` subscriber at INFO.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl TelemetrySink for LogSink {
    fn submit(&self, event_name: &str, attributes: Attributes) {
        let attributes = serde_json::Value::Object(attributes);
        tracing::info!(event = event_name, %attributes, "slot telemetry");
    }
}
