//! Timing primitives.
//!
//! Every elapsed-time attribute the tracker reports comes from a
//! [`Chronometer`] read against a [`Clock`]. The clock is injected so the
//! tracker can run against wall time in production and a hand-driven clock
//! in tests and scenario replay.

mod chronometer;
mod clock;

pub use chronometer::Chronometer;
pub use clock::{Clock, ManualClock, SystemClock};
