//! Session timebase and timers
//!
//! All analysis, debounce and capture deadlines are expressed as [`Timestamp`]s
//! on a single [`SessionClock`], so the state machines can be driven by real
//! time in a session or by hand in tests.

pub mod timer;

pub use timer::{IntervalTimer, OneShotTimer, Timer};

use serde::{Deserialize, Serialize};
use std::ops::Add;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Offset from the start of a session's clock.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timestamp(Duration);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(Duration::ZERO);

    pub const fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }

    pub fn as_millis(&self) -> u128 {
        self.0.as_millis()
    }

    /// Time elapsed since `earlier`, zero if `earlier` is in the future.
    pub fn saturating_since(&self, earlier: Timestamp) -> Duration {
        self.0.saturating_sub(earlier.0)
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Timestamp {
        Timestamp(self.0 + rhs)
    }
}

/// Monotonic clock shared by every component of a session
///
/// Sensor and frame sources stamp their samples with the same clock the
/// session uses for its timers. Built on the tokio clock so paused-time tests
/// advance it deterministically.
#[derive(Debug, Clone)]
pub struct SessionClock {
    start: Arc<Instant>,
}

impl SessionClock {
    /// Create a clock with the current instant as time zero
    pub fn new() -> Self {
        Self {
            start: Arc::new(Instant::now()),
        }
    }

    #[inline]
    pub fn now(&self) -> Timestamp {
        Timestamp(self.start.elapsed())
    }

    /// The instant must be after the clock's start time; earlier instants map to zero.
    #[inline]
    pub fn timestamp_at(&self, instant: Instant) -> Timestamp {
        Timestamp(instant.saturating_duration_since(*self.start))
    }

    /// Wall instant corresponding to a timestamp, used to arm sleeps.
    #[inline]
    pub fn instant_at(&self, timestamp: Timestamp) -> Instant {
        *self.start + timestamp.0
    }

    pub fn start_instant(&self) -> Instant {
        *self.start
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_arithmetic() {
        let t = Timestamp::from_millis(100) + Duration::from_millis(400);
        assert_eq!(t, Timestamp::from_millis(500));
        assert_eq!(
            t.saturating_since(Timestamp::from_millis(200)),
            Duration::from_millis(300)
        );
        assert_eq!(
            Timestamp::ZERO.saturating_since(t),
            Duration::ZERO
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_follows_tokio_time() {
        let clock = SessionClock::new();
        assert_eq!(clock.now(), Timestamp::ZERO);

        tokio::time::advance(Duration::from_millis(250)).await;
        assert_eq!(clock.now(), Timestamp::from_millis(250));

        let at = clock.instant_at(Timestamp::from_millis(900));
        assert_eq!(clock.timestamp_at(at), Timestamp::from_millis(900));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cloned_clocks_share_timebase() {
        let clock = SessionClock::new();
        tokio::time::advance(Duration::from_millis(40)).await;
        let shared = clock.clone();
        assert_eq!(shared.start_instant(), clock.start_instant());
        assert_eq!(shared.now(), clock.now());
    }
}
