//! The ad slot tracker façade.
//!
//! Wiring:
//!
//! ```text
//!   AdService event bus
//!          │  (one listener per AdEventKind, holding a Weak handle)
//!          ▼
//!   AdSlotTracker::handle_event
//!          │  borrow TrackerState → route → release borrow
//!          ▼
//!   Tracker::send → TelemetrySink::submit
//! ```

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use slotscope_types::TrackerConfig;

use super::registry::{Tracker, TrackerRegistry};
use super::router::TrackerState;
use crate::ad_service::AdService;
use crate::events::{AdEvent, AdEventKind, Attributes};
use crate::sink::TelemetrySink;
use crate::state::Visibility;
use crate::targeting::TargetingKeyRegistry;
use crate::timing::{Clock, SystemClock};

/// Name reported to the telemetry host. Kept stable for downstream queries.
pub const TRACKER_NAME: &str = "google-publisher-tag";

/// External collaborators handed to a tracker at construction.
pub struct TrackerContext {
    /// `None` when the ad library is not on the page; the tracker stays inert.
    pub service: Option<Rc<dyn AdService>>,
    pub sink: Rc<dyn TelemetrySink>,
    pub clock: Rc<dyn Clock>,
    pub config: TrackerConfig,
}

impl TrackerContext {
    pub fn new(service: Option<Rc<dyn AdService>>, sink: Rc<dyn TelemetrySink>) -> Self {
        Self {
            service,
            sink,
            clock: Rc::new(SystemClock),
            config: TrackerConfig::default(),
        }
    }

    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_config(mut self, config: TrackerConfig) -> Self {
        self.config = config;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListenerState {
    Unregistered,
    /// Registration queued on the ad library's command queue.
    Pending,
    Registered,
}

/// Passive listener turning ad-library slot events into telemetry.
pub struct AdSlotTracker {
    this: Weak<AdSlotTracker>,
    service: Option<Rc<dyn AdService>>,
    sink: Rc<dyn TelemetrySink>,
    clock: Rc<dyn Clock>,
    state: RefCell<TrackerState>,
    listeners: Cell<ListenerState>,
    disposed: Cell<bool>,
}

impl AdSlotTracker {
    /// Register a tracker with `registry` and hook it to the ad library.
    ///
    /// Idempotent: if the registry already holds an `AdSlotTracker`, that
    /// instance is returned and `ctx` is dropped unused.
    pub fn init(registry: &mut TrackerRegistry, ctx: TrackerContext) -> Rc<Self> {
        if let Some(existing) = registry.find::<AdSlotTracker>() {
            tracing::debug!("ad slot tracker already registered");
            return existing;
        }

        let tracker = Self::new(ctx);
        registry.add_tracker(tracker.clone());
        tracker.register_listeners();
        tracker
    }

    /// Build an unregistered tracker. Most callers want [`init`](Self::init).
    pub fn new(ctx: TrackerContext) -> Rc<Self> {
        let TrackerContext {
            service,
            sink,
            clock,
            config,
        } = ctx;

        let mut state = TrackerState {
            targeting: TargetingKeyRegistry::with_keys(config.targeting_keys),
            ..TrackerState::default()
        };
        state.trigger.set_level(config.visibility_trigger_level);

        Rc::new_cyclic(|this| Self {
            this: this.clone(),
            service,
            sink,
            clock,
            state: RefCell::new(state),
            listeners: Cell::new(ListenerState::Unregistered),
            disposed: Cell::new(false),
        })
    }

    /// Attach to the ad library's event bus, now if its API is ready,
    /// otherwise once it drains its command queue. Runs at most once.
    pub fn register_listeners(&self) {
        if self.listeners.get() != ListenerState::Unregistered {
            return;
        }
        let Some(service) = &self.service else {
            tracing::debug!("ad library not present, tracker inert");
            return;
        };

        if service.is_api_ready() {
            self.attach_listeners();
        } else {
            tracing::debug!("ad library not ready, deferring listener registration");
            self.listeners.set(ListenerState::Pending);
            let this = self.this.clone();
            service.push_command(Box::new(move || {
                if let Some(tracker) = this.upgrade() {
                    tracker.attach_listeners();
                }
            }));
        }
    }

    fn attach_listeners(&self) {
        if self.listeners.get() == ListenerState::Registered {
            return;
        }
        let Some(service) = &self.service else {
            return;
        };

        for kind in AdEventKind::ALL {
            let this = self.this.clone();
            service.add_event_listener(
                kind,
                Rc::new(move |event: &AdEvent| {
                    if let Some(tracker) = this.upgrade() {
                        tracker.handle_event(event);
                    }
                }),
            );
        }
        self.listeners.set(ListenerState::Registered);
        tracing::debug!(count = AdEventKind::ALL.len(), "ad library listeners registered");
    }

    pub fn listeners_registered(&self) -> bool {
        self.listeners.get() == ListenerState::Registered
    }

    /// Entry point for every ad-library event.
    pub fn handle_event(&self, event: &AdEvent) {
        if self.disposed.get() {
            return;
        }
        tracing::debug!(
            kind = event.kind.as_str(),
            slot_id = event.slot_id(),
            "ad event"
        );

        let now = self.clock.now();
        let outbound = self
            .state
            .borrow_mut()
            .route(event, now, self.service.as_deref());

        // State borrow is released before the sink sees the event.
        if let Some((name, attributes)) = outbound {
            self.send(name.as_str(), attributes);
        }
    }

    // --- Host configuration ---

    /// Report targeting key `key` on every event.
    pub fn set_targeting_key(&self, key: &str) {
        self.state.borrow_mut().targeting.register(key);
    }

    /// Forget registered keys; every live key is reported again.
    pub fn flush_targeting_keys(&self) {
        self.state.borrow_mut().targeting.clear();
    }

    pub fn targeting_keys(&self) -> Vec<String> {
        self.state.borrow().targeting.current_keys().to_vec()
    }

    /// Returns `false` and keeps the current level if `percent` exceeds 100.
    pub fn set_visibility_trigger_level(&self, percent: u8) -> bool {
        self.state.borrow_mut().trigger.set_level(percent)
    }

    pub fn visibility_trigger_level(&self) -> u8 {
        self.state.borrow().trigger.level()
    }

    /// Clear every slot timer and registered targeting key.
    /// Slot visibility is kept.
    pub fn reset(&self) {
        let mut state = self.state.borrow_mut();
        state.slots.reset_timers();
        state.targeting.clear();
    }

    // --- Inspection ---

    pub fn slot_visibility(&self, slot_id: &str) -> Option<Visibility> {
        self.state
            .borrow()
            .slots
            .get(slot_id)
            .map(|slot| slot.visibility)
    }

    pub fn tracked_slots(&self) -> usize {
        self.state.borrow().slots.len()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }
}

impl Tracker for AdSlotTracker {
    fn name(&self) -> &str {
        TRACKER_NAME
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn send(&self, event_name: &str, attributes: Attributes) {
        self.sink.submit(event_name, attributes);
    }

    fn on_registered(&self) {
        tracing::info!(name = TRACKER_NAME, version = self.version(), "tracker registered");
    }

    fn dispose(&self) {
        self.disposed.set(true);
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}
