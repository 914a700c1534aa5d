//! Per-slot tracking state.

use chrono::NaiveDateTime;

use crate::timing::Chronometer;

/// Lifecycle timers kept for every slot, each restarted when its event fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotTimer {
    Load,
    Received,
    Rendered,
    Requested,
}

impl SlotTimer {
    /// Attribute order matches the order timers appear in emitted events.
    pub const ALL: [SlotTimer; 4] = [
        SlotTimer::Load,
        SlotTimer::Received,
        SlotTimer::Rendered,
        SlotTimer::Requested,
    ];

    /// Attribute name carrying this timer's elapsed value.
    pub fn attribute(&self) -> &'static str {
        match self {
            Self::Load => "timeSinceSlotLoad",
            Self::Received => "timeSinceSlotReceived",
            Self::Rendered => "timeSinceSlotRendered",
            Self::Requested => "timeSinceSlotRequested",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Whether a slot currently counts as in view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Hidden,
    Visible,
}

/// Mutable record for one ad slot. Lives as long as the page.
#[derive(Debug, Clone, Default)]
pub struct SlotState {
    pub visibility: Visibility,
    /// Running while the slot is visible; started on every Hidden -> Visible.
    pub visibility_chrono: Chronometer,
    /// Started on every Visible -> Hidden, read by the next Hidden -> Visible.
    pub last_hidden_chrono: Chronometer,
    timers: [Chronometer; SlotTimer::ALL.len()],
}

impl SlotState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    pub fn timer(&self, timer: SlotTimer) -> &Chronometer {
        &self.timers[timer.index()]
    }

    /// Restart a lifecycle timer. A timer that was never read since its last
    /// start simply loses that interval.
    pub fn restart_timer(&mut self, timer: SlotTimer, now: NaiveDateTime) {
        let chrono = &mut self.timers[timer.index()];
        if chrono.is_started() {
            tracing::trace!(?timer, "restarting slot timer");
        }
        chrono.start(now);
    }

    /// Elapsed milliseconds for every lifecycle timer, in attribute order.
    pub fn timer_readings(
        &self,
        now: NaiveDateTime,
    ) -> impl Iterator<Item = (SlotTimer, Option<i64>)> + '_ {
        SlotTimer::ALL
            .into_iter()
            .map(move |timer| (timer, self.timer(timer).elapsed_ms(now)))
    }

    /// Return every chronometer to the not-started state. Visibility is kept.
    pub fn clear_timers(&mut self) {
        for chrono in &mut self.timers {
            chrono.clear();
        }
        self.last_hidden_chrono.clear();
    }
}
