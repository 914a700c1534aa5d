//! Tracker façade and the registry it plugs into.
//!
//! The telemetry host keeps a [`TrackerRegistry`] of [`Tracker`]s. The only
//! tracker in this crate is [`AdSlotTracker`], which listens to an
//! [`AdService`](crate::ad_service::AdService) and turns its events into
//! `SLOT_*` telemetry.

mod ad_slot;
mod registry;
mod router;


pub use ad_slot::{AdSlotTracker, TRACKER_NAME, TrackerContext};
pub use registry::{Tracker, TrackerRegistry};
