use std::fmt;

/// Outbound attribute dictionary. Insertion order is preserved so emitted
/// events list identity fields first.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Telemetry event names sent to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotEventName {
    SlotRequested,
    SlotReceived,
    SlotRendered,
    SlotLoad,
    SlotViewable,
    SlotHidden,
}

impl SlotEventName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SlotRequested => "SLOT_REQUESTED",
            Self::SlotReceived => "SLOT_RECEIVED",
            Self::SlotRendered => "SLOT_RENDERED",
            Self::SlotLoad => "SLOT_LOAD",
            Self::SlotViewable => "SLOT_VIEWABLE",
            Self::SlotHidden => "SLOT_HIDDEN",
        }
    }
}

impl fmt::Display for SlotEventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
