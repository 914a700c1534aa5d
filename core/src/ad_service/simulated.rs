use std::cell::{Cell, RefCell};

use hashbrown::HashMap;

use super::{AdService, Command, EventListener, TargetingValue};
use crate::events::{AdEvent, AdEventKind};

/// In-process stand-in for the ad library.
///
/// Holds a ready flag with a command queue, a listener table, and page-level
/// targeting. Drives the replay binary and the tracker tests.
#[derive(Default)]
pub struct SimulatedAdService {
    ready: Cell<bool>,
    queue: RefCell<Vec<Command>>,
    listeners: RefCell<HashMap<AdEventKind, Vec<EventListener>>>,
    targeting: RefCell<Vec<(String, TargetingValue)>>,
}

impl SimulatedAdService {
    /// A service whose API is already loaded.
    pub fn ready() -> Self {
        let service = Self::default();
        service.ready.set(true);
        service
    }

    /// A service that queues commands until [`set_api_ready`](Self::set_api_ready).
    pub fn loading() -> Self {
        Self::default()
    }

    /// Mark the API as loaded and drain the command queue in FIFO order.
    pub fn set_api_ready(&self) {
        self.ready.set(true);
        loop {
            // Commands may queue further commands; take a batch at a time so
            // no borrow is held while running them.
            let batch = std::mem::take(&mut *self.queue.borrow_mut());
            if batch.is_empty() {
                break;
            }
            for command in batch {
                command();
            }
        }
    }

    pub fn pending_commands(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn listener_count(&self, kind: AdEventKind) -> usize {
        self.listeners.borrow().get(&kind).map_or(0, Vec::len)
    }

    /// Set (or replace) a page-level targeting key.
    pub fn set_targeting(&self, key: &str, value: TargetingValue) {
        let mut targeting = self.targeting.borrow_mut();
        match targeting.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value,
            None => targeting.push((key.to_string(), value)),
        }
    }

    pub fn clear_targeting(&self) {
        self.targeting.borrow_mut().clear();
    }

    /// Deliver `event` to every listener registered for its kind.
    /// Returns how many listeners ran.
    pub fn dispatch(&self, event: &AdEvent) -> usize {
        // Clone the listener list so a listener may register further listeners.
        let listeners = self
            .listeners
            .borrow()
            .get(&event.kind)
            .cloned()
            .unwrap_or_default();
        for listener in &listeners {
            listener(event);
        }
        listeners.len()
    }
}

impl AdService for SimulatedAdService {
    fn is_api_ready(&self) -> bool {
        self.ready.get()
    }

    fn push_command(&self, command: Command) {
        if self.ready.get() {
            command();
        } else {
            self.queue.borrow_mut().push(command);
        }
    }

    fn add_event_listener(&self, kind: AdEventKind, listener: EventListener) {
        self.listeners
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push(listener);
    }

    fn targeting_keys(&self) -> Vec<String> {
        self.targeting
            .borrow()
            .iter()
            .map(|(key, _)| key.clone())
            .collect()
    }

    fn targeting(&self, key: &str) -> Option<TargetingValue> {
        self.targeting
            .borrow()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.clone())
    }
}
