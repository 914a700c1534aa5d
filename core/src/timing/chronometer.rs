use chrono::NaiveDateTime;

/// Stopwatch measuring milliseconds since its last `start`.
///
/// A chronometer that was never started has no elapsed time at all:
/// [`elapsed_ms`](Self::elapsed_ms) returns `None` rather than zero, and the
/// attribute builder reports that as `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Chronometer {
    started_at: Option<NaiveDateTime>,
}

impl Chronometer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the reference point to `now`. Any running interval is discarded.
    pub fn start(&mut self, now: NaiveDateTime) {
        self.started_at = Some(now);
    }

    /// Forget the start point, returning to the not-started state.
    pub fn clear(&mut self) {
        self.started_at = None;
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Milliseconds since the last `start`, or `None` if never started.
    /// A clock that moved backwards reads as 0.
    pub fn elapsed_ms(&self, now: NaiveDateTime) -> Option<i64> {
        self.started_at
            .map(|start| now.signed_duration_since(start).num_milliseconds().max(0))
    }
}
