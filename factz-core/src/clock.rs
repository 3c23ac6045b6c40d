//! Time sources for value cells.
//!
//! Cells never read the wall clock directly; they hold a [`SharedClock`]
//! injected at construction. Production code uses [`SystemClock`]; tests and
//! deterministic replays use [`ManualClock`] and advance it explicitly.

use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::Timestamp;

/// A source of current wall-clock time at one-second resolution.
pub trait Clock {
    /// The current timestamp.
    fn now(&self) -> Timestamp;
}

/// Shared handle to a clock, cloned into every cell that needs one.
pub type SharedClock = Arc<dyn Clock>;

/// Real wall-clock time, truncated to whole seconds.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let secs = Utc::now().timestamp();
        // Pre-epoch system clocks collapse to the NEVER sentinel rather than
        // wrapping.
        Timestamp(u64::try_from(secs).unwrap_or(0))
    }
}

/// Manually driven clock for tests and replays.
///
/// Starts at 1 (not 0) so a fresh manual clock is already distinguishable
/// from the never-computed sentinel.
#[derive(Debug)]
pub struct ManualClock(AtomicU64);

impl ManualClock {
    /// Create a clock at the given second.
    #[must_use]
    pub fn new(seconds: u64) -> Self {
        Self(AtomicU64::new(seconds))
    }

    /// Create a shared clock starting at second 1.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new(1))
    }

    /// Move the clock forward.
    pub fn advance(&self, seconds: u64) {
        self.0.fetch_add(seconds, Ordering::Relaxed);
    }

    /// Jump the clock to an absolute second.
    pub fn set(&self, seconds: u64) {
        self.0.store(seconds, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.0.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(10);
        assert_eq!(clock.now(), Timestamp(10));
        clock.advance(5);
        assert_eq!(clock.now(), Timestamp(15));
        clock.set(100);
        assert_eq!(clock.now(), Timestamp(100));
    }

    #[test]
    fn system_clock_is_past_epoch() {
        assert!(!SystemClock.now().is_never());
    }
}
