//! Deadline timers owned by the state machines.
//!
//! A timer never runs code itself. Its owner asks it whether it is due with
//! [`Timer::fire`] and the session sleeps until the earliest [`Timer::deadline`].
//! Cancelling drops the deadline, so a cancelled timer can never fire late.

use super::Timestamp;
use std::time::Duration;

pub trait Timer {
    /// Next instant this timer fires, `None` when disarmed.
    fn deadline(&self) -> Option<Timestamp>;

    /// Disarm the timer. Cancelling a disarmed timer is a no-op.
    fn cancel(&mut self);

    /// Consume one firing if the deadline is at or before `now`.
    fn fire(&mut self, now: Timestamp) -> bool;

    fn is_armed(&self) -> bool {
        self.deadline().is_some()
    }
}

/// Fires once, `delay` after it was armed.
#[derive(Debug, Clone, Default)]
pub struct OneShotTimer {
    armed_at: Option<Timestamp>,
    deadline: Option<Timestamp>,
}

impl OneShotTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm (or re-arm) the timer. Any earlier deadline is replaced.
    pub fn schedule(&mut self, now: Timestamp, delay: Duration) {
        self.armed_at = Some(now);
        self.deadline = Some(now + delay);
    }

    pub fn armed_at(&self) -> Option<Timestamp> {
        self.armed_at
    }
}

impl Timer for OneShotTimer {
    fn deadline(&self) -> Option<Timestamp> {
        self.deadline
    }

    fn cancel(&mut self) {
        self.armed_at = None;
        self.deadline = None;
    }

    fn fire(&mut self, now: Timestamp) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.cancel();
                true
            }
            _ => false,
        }
    }
}

/// Fires every `period` after it was started, until cancelled.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    period: Duration,
    next: Option<Timestamp>,
}

impl IntervalTimer {
    pub fn new(period: Duration) -> Self {
        Self { period, next: None }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Start (or restart) ticking. The first tick is one period after `now`.
    pub fn start(&mut self, now: Timestamp) {
        self.next = Some(now + self.period);
    }

    /// Start ticking with the first tick due immediately.
    pub fn start_immediately(&mut self, now: Timestamp) {
        self.next = Some(now);
    }
}

impl Timer for IntervalTimer {
    fn deadline(&self) -> Option<Timestamp> {
        self.next
    }

    fn cancel(&mut self) {
        self.next = None;
    }

    fn fire(&mut self, now: Timestamp) -> bool {
        match self.next {
            Some(due) if due <= now => {
                // Missed ticks are dropped rather than replayed in a burst.
                let mut next = due + self.period;
                if next <= now {
                    next = now + self.period;
                }
                self.next = Some(next);
                true
            }
            _ => false,
        }
    }
}
