//! Boundary to the ad-serving library.
//!
//! The tracker never touches the ad library directly; it is handed an
//! [`AdService`] and only uses the handful of calls below.

mod simulated;

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::events::{AdEvent, AdEventKind};

pub use simulated::SimulatedAdService;

/// Deferred work queued until the ad library is ready.
pub type Command = Box<dyn FnOnce()>;

/// Callback registered on the ad library's event bus.
pub type EventListener = Rc<dyn Fn(&AdEvent)>;

/// Value of a page-level targeting key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetingValue {
    Scalar(String),
    List(Vec<String>),
}

pub trait AdService {
    /// Whether the library has finished loading its API.
    fn is_api_ready(&self) -> bool;

    /// Queue `command` to run once the library is ready.
    fn push_command(&self, command: Command);

    fn add_event_listener(&self, kind: AdEventKind, listener: EventListener);

    /// Every targeting key currently set on the page, in library order.
    fn targeting_keys(&self) -> Vec<String>;

    /// Value for `key`, or `None` if the library does not know the key.
    fn targeting(&self, key: &str) -> Option<TargetingValue>;
}
