use std::any::Any;
use std::rc::Rc;

use crate::events::Attributes;

/// Capability interface every registered tracker provides.
pub trait Tracker {
    fn name(&self) -> &str;

    fn version(&self) -> &str;

    /// Forward a named event to the telemetry sink.
    fn send(&self, event_name: &str, attributes: Attributes);

    /// Called once the registry has accepted the tracker.
    fn on_registered(&self) {}

    /// Stop producing events. The tracker stays registered but goes inert.
    fn dispose(&self) {}

    /// Upcast used by [`TrackerRegistry::find`].
    fn into_any(self: Rc<Self>) -> Rc<dyn Any>;
}

/// Trackers registered with the telemetry host.
#[derive(Default)]
pub struct TrackerRegistry {
    trackers: Vec<Rc<dyn Tracker>>,
}

impl TrackerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trackers(&self) -> &[Rc<dyn Tracker>] {
        &self.trackers
    }

    pub fn add_tracker(&mut self, tracker: Rc<dyn Tracker>) {
        tracing::debug!(name = tracker.name(), version = tracker.version(), "tracker added");
        self.trackers.push(Rc::clone(&tracker));
        tracker.on_registered();
    }

    /// First registered tracker of concrete type `T`.
    pub fn find<T: Tracker + 'static>(&self) -> Option<Rc<T>> {
        self.trackers
            .iter()
            .find_map(|tracker| Rc::clone(tracker).into_any().downcast::<T>().ok())
    }

    /// Dispose every tracker and empty the registry.
    pub fn clear(&mut self) {
        for tracker in self.trackers.drain(..) {
            tracker.dispose();
        }
    }

    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct NullTracker {
        registered: Cell<bool>,
        disposed: Cell<bool>,
    }

    impl Tracker for NullTracker {
        fn name(&self) -> &str {
            "null"
        }

        fn version(&self) -> &str {
            "0.0.0"
        }

        fn send(&self, _event_name: &str, _attributes: Attributes) {}

        fn on_registered(&self) {
            self.registered.set(true);
        }

        fn dispose(&self) {
            self.disposed.set(true);
        }

        fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
            self
        }
    }

    #[test]
    fn find_downcasts_to_concrete_type() {
        let mut registry = TrackerRegistry::new();
        assert!(registry.find::<NullTracker>().is_none());

        let tracker = Rc::new(NullTracker::default());
        registry.add_tracker(tracker.clone());
        assert!(tracker.registered.get());

        let found = registry.find::<NullTracker>().unwrap();
        assert!(Rc::ptr_eq(&found, &tracker));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn clear_disposes_trackers() {
        let mut registry = TrackerRegistry::new();
        let tracker = Rc::new(NullTracker::default());
        registry.add_tracker(tracker.clone());

        registry.clear();
        assert!(tracker.disposed.get());
        assert!(registry.is_empty());
    }
}
