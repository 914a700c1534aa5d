//! Visibility state machine.
//!
//! Each slot is either `Hidden` or `Visible`. A visibility reading moves it
//! only when it crosses the trigger level:
//! - Hidden -> Visible: reading >= trigger
//! - Visible -> Hidden: reading < trigger
//!
//! Anything else is a no-op, so repeated readings on the same side of the
//! threshold never produce duplicate transitions.

use chrono::NaiveDateTime;
use slotscope_types::{DEFAULT_VISIBILITY_TRIGGER_LEVEL, MAX_VISIBILITY_TRIGGER_LEVEL};

use crate::state::{SlotState, Visibility};

/// What caused a visibility evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityInput {
    /// In-view percentage from a visibility-changed event.
    Reading(u8),
    /// The ad library declared the impression viewable.
    ImpressionViewable,
}

/// A transition that happened, with the timings the outbound event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityTransition {
    BecameVisible {
        /// `None` if the slot was never hidden before.
        time_since_last_hidden_ms: Option<i64>,
    },
    BecameHidden {
        time_visible_ms: Option<i64>,
    },
}

/// Trigger level shared by every slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityTrigger {
    level: u8,
}

impl Default for VisibilityTrigger {
    fn default() -> Self {
        Self {
            level: DEFAULT_VISIBILITY_TRIGGER_LEVEL,
        }
    }
}

impl VisibilityTrigger {
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Set the trigger level. Values above 100 are rejected and the previous
    /// level is kept; returns whether the value was accepted.
    pub fn set_level(&mut self, percent: u8) -> bool {
        if percent > MAX_VISIBILITY_TRIGGER_LEVEL {
            tracing::warn!(
                percent,
                current = self.level,
                "visibility trigger level out of range, keeping current"
            );
            return false;
        }
        self.level = percent;
        true
    }

    /// Apply `input` to `state`, mutating it and starting the matching
    /// chronometer when a transition fires.
    pub fn advance(
        &self,
        state: &mut SlotState,
        input: VisibilityInput,
        now: NaiveDateTime,
    ) -> Option<VisibilityTransition> {
        let reaches_trigger = match input {
            VisibilityInput::Reading(percent) => percent >= self.level,
            VisibilityInput::ImpressionViewable => true,
        };

        match (state.visibility, reaches_trigger) {
            (Visibility::Hidden, true) => {
                let time_since_last_hidden_ms = state.last_hidden_chrono.elapsed_ms(now);
                state.visibility = Visibility::Visible;
                state.visibility_chrono.start(now);
                Some(VisibilityTransition::BecameVisible {
                    time_since_last_hidden_ms,
                })
            }
            (Visibility::Visible, false) => {
                let time_visible_ms = state.visibility_chrono.elapsed_ms(now);
                state.visibility = Visibility::Hidden;
                state.last_hidden_chrono.start(now);
                Some(VisibilityTransition::BecameHidden { time_visible_ms })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::{Clock, ManualClock};

    #[test]
    fn trigger_rejects_out_of_range() {
        let mut trigger = VisibilityTrigger::default();
        assert_eq!(trigger.level(), 50);

        assert!(trigger.set_level(0));
        assert_eq!(trigger.level(), 0);
        assert!(trigger.set_level(100));
        assert_eq!(trigger.level(), 100);

        assert!(!trigger.set_level(101));
        assert_eq!(trigger.level(), 100);
    }

    #[test]
    fn crossing_up_then_down() {
        let clock = ManualClock::default();
        let trigger = VisibilityTrigger::default();
        let mut state = SlotState::new();

        let up = trigger.advance(&mut state, VisibilityInput::Reading(60), clock.now());
        assert_eq!(
            up,
            Some(VisibilityTransition::BecameVisible {
                time_since_last_hidden_ms: None
            })
        );
        assert!(state.is_visible());

        clock.advance_ms(1_500);
        let down = trigger.advance(&mut state, VisibilityInput::Reading(20), clock.now());
        assert_eq!(
            down,
            Some(VisibilityTransition::BecameHidden {
                time_visible_ms: Some(1_500)
            })
        );
        assert!(!state.is_visible());

        clock.advance_ms(400);
        let again = trigger.advance(&mut state, VisibilityInput::Reading(50), clock.now());
        assert_eq!(
            again,
            Some(VisibilityTransition::BecameVisible {
                time_since_last_hidden_ms: Some(400)
            })
        );
    }

    #[test]
    fn non_crossing_readings_do_nothing() {
        let clock = ManualClock::default();
        let trigger = VisibilityTrigger::default();
        let mut state = SlotState::new();

        assert_eq!(trigger.advance(&mut state, VisibilityInput::Reading(10), clock.now()), None);
        assert_eq!(trigger.advance(&mut state, VisibilityInput::Reading(49), clock.now()), None);
        assert!(trigger.advance(&mut state, VisibilityInput::Reading(50), clock.now()).is_some());
        assert_eq!(trigger.advance(&mut state, VisibilityInput::Reading(90), clock.now()), None);
        assert_eq!(trigger.advance(&mut state, VisibilityInput::Reading(50), clock.now()), None);
    }

    #[test]
    fn transitions_match_crossings_for_any_sequence() {
        let readings = [0u8, 70, 80, 30, 30, 51, 49, 100, 0, 0, 50, 50, 12];
        let clock = ManualClock::default();
        let trigger = VisibilityTrigger::default();
        let mut state = SlotState::new();

        let (mut up, mut down) = (0, 0);
        for reading in readings {
            match trigger.advance(&mut state, VisibilityInput::Reading(reading), clock.now()) {
                Some(VisibilityTransition::BecameVisible { .. }) => up += 1,
                Some(VisibilityTransition::BecameHidden { .. }) => down += 1,
                None => {}
            }
        }

        // Expected crossings computed independently of the state machine.
        let mut visible = false;
        let (mut want_up, mut want_down) = (0, 0);
        for reading in readings {
            let above = reading >= 50;
            if above != visible {
                if above { want_up += 1 } else { want_down += 1 }
                visible = above;
            }
        }
        assert_eq!((up, down), (want_up, want_down));
        assert_eq!((up, down), (4, 4));
    }

    #[test]
    fn impression_viewable_only_fires_when_hidden() {
        let clock = ManualClock::default();
        let trigger = VisibilityTrigger::default();
        let mut state = SlotState::new();

        assert!(
            trigger
                .advance(&mut state, VisibilityInput::ImpressionViewable, clock.now())
                .is_some()
        );
        assert_eq!(
            trigger.advance(&mut state, VisibilityInput::ImpressionViewable, clock.now()),
            None
        );
    }

    #[test]
    fn custom_trigger_level_moves_threshold() {
        let clock = ManualClock::default();
        let mut trigger = VisibilityTrigger::default();
        trigger.set_level(80);
        let mut state = SlotState::new();

        assert_eq!(trigger.advance(&mut state, VisibilityInput::Reading(60), clock.now()), None);
        assert!(trigger.advance(&mut state, VisibilityInput::Reading(80), clock.now()).is_some());
        assert!(trigger.advance(&mut state, VisibilityInput::Reading(79), clock.now()).is_some());
    }
}
