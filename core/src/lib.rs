//! Ad slot lifecycle telemetry.
//!
//! Listens to an ad-serving library's event bus and turns slot lifecycle
//! events (request, response, render, load, visibility) into named
//! telemetry events with enriched attributes.
//!
//! Pipeline per event: [`tracker`] routes it, [`state`] holds per-slot
//! timers and visibility, [`attributes`] builds the dictionary (pulling
//! [`targeting`] values), [`visibility`] decides transitions, and a
//! [`sink::TelemetrySink`] receives the result.

pub mod ad_service;
pub mod attributes;
pub mod config;
pub mod events;
pub mod sink;
pub mod state;
pub mod targeting;
pub mod timing;
pub mod tracker;
pub mod visibility;

// Re-exports for convenience
pub use ad_service::{AdService, SimulatedAdService, TargetingValue};
pub use events::{AdEvent, AdEventKind, Attributes, SlotEventName, SlotInfo};
pub use sink::{LogSink, RecordingSink, TelemetrySink};
pub use slotscope_types::TrackerConfig;
pub use tracker::{AdSlotTracker, Tracker, TrackerContext, TrackerRegistry};
