use hashbrown::HashMap;

use super::SlotState;

/// Slot identifier -> state, with lazy insertion.
///
/// There is deliberately no removal: a slot's state lives for the page.
#[derive(Debug, Clone, Default)]
pub struct SlotStateStore {
    slots: HashMap<String, SlotState>,
}

impl SlotStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// State for `slot_id`, created hidden with unstarted timers on first use.
    pub fn get_or_create(&mut self, slot_id: &str) -> &mut SlotState {
        self.slots.entry_ref(slot_id).or_insert_with(|| {
            tracing::debug!(slot_id, "tracking new slot");
            SlotState::new()
        })
    }

    pub fn get(&self, slot_id: &str) -> Option<&SlotState> {
        self.slots.get(slot_id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot_ids(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    /// Clear every slot's timers; see [`SlotState::clear_timers`].
    pub fn reset_timers(&mut self) {
        for state in self.slots.values_mut() {
            state.clear_timers();
        }
    }
}
