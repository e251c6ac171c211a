use std::time::{Duration, Instant};

use super::types::ChangeKind;

/// Longest the watch loop sleeps between checks.
pub(super) const TICK: Duration = Duration::from_millis(500);

/// Coalesces a burst of events into one change.
///
/// Pure timing: callers decide what a ready burst means.
pub(super) struct Debouncer {
    window: Duration,
    pending: Vec<ChangeKind>,
    last_event: Option<Instant>,
}

impl Debouncer {
    pub(super) fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Vec::new(),
            last_event: None,
        }
    }

    /// Zero window: every event stands alone.
    pub(super) fn is_passthrough(&self) -> bool {
        self.window.is_zero()
    }

    pub(super) fn add(&mut self, kind: ChangeKind) {
        self.pending.push(kind);
        self.last_event = Some(Instant::now());
    }

    pub(super) fn is_ready(&self) -> bool {
        match self.last_event {
            Some(last) => !self.pending.is_empty() && last.elapsed() >= self.window,
            None => false,
        }
    }

    /// Take the burst once the window has been quiet.
    pub(super) fn take_if_ready(&mut self) -> Option<Vec<ChangeKind>> {
        if !self.is_ready() {
            return None;
        }
        self.last_event = None;
        Some(std::mem::take(&mut self.pending))
    }

    /// How long the loop may block before the next check.
    pub(super) fn sleep_duration(&self) -> Duration {
        let Some(last) = self.last_event else {
            return TICK;
        };
        self.window
            .saturating_sub(last.elapsed())
            .clamp(Duration::from_millis(1), TICK)
    }
}
