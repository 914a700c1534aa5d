//! Shared configuration types for the slotscope tracker.
//!
//! Kept free of runtime dependencies so both the core library and the
//! replay binary can deserialize the same TOML files.

mod config;

pub use config::{DEFAULT_VISIBILITY_TRIGGER_LEVEL, MAX_VISIBILITY_TRIGGER_LEVEL, TrackerConfig};
