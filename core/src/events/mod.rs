//! Event vocabulary on both sides of the tracker: raw ad-library events coming
//! in, named telemetry events going out.

mod ad_event;
mod slot_event;

pub use ad_event::{AdEvent, AdEventKind, AdSize, ResponseInfo, SlotInfo};
pub use slot_event::{Attributes, SlotEventName};
