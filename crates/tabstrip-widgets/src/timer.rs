#![forbid(unsafe_code)]

//! Polled repeating timer.
//!
//! Nothing runs in the background: the owner's event loop asks
//! [`RepeatingTimer::next_deadline`] when to wake up and calls
//! [`RepeatingTimer::poll`] with the current time. Stopping is a plain
//! synchronous call and dropping the owner drops the timer with it.

use web_time::{Duration, Instant};

/// Fires every `period` while running.
#[derive(Debug, Clone)]
pub struct RepeatingTimer {
    period: Duration,
    next: Option<Instant>,
}

impl RepeatingTimer {
    #[must_use]
    pub const fn new(period: Duration) -> Self {
        Self { period, next: None }
    }

    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Change the period; a running timer keeps its current deadline.
    pub fn set_period(&mut self, period: Duration) {
        self.period = period;
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.next.is_some()
    }

    /// Start counting from `now`. Restarting resets the deadline.
    pub fn start(&mut self, now: Instant) {
        self.next = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    /// When the next tick is due.
    #[must_use]
    pub const fn next_deadline(&self) -> Option<Instant> {
        self.next
    }

    /// Whether a tick is due at `now`.
    ///
    /// Fires at most once per call; missed periods are skipped, not queued.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(next) = self.next else {
            return false;
        };
        if now < next {
            return false;
        }
        let mut following = next + self.period;
        if following <= now {
            following = now + self.period;
        }
        self.next = Some(following);
        true
    }
}
