//! Time sources consumed by the world.
//!
//! Readings are offsets from an arbitrary epoch. The world never reads a
//! clock itself; adapters sample one per tick and pass the reading in, which
//! keeps every transition reproducible under test.

use std::time::{Duration, Instant};

/// Monotonic source of elapsed time.
pub trait Clock {
    /// Time elapsed since the clock's epoch.
    fn now(&self) -> Duration;
}

/// Clock backed by [`Instant`], anchored at construction.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    /// Starts a clock whose epoch is the current instant.
    #[must_use]
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::start()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Clock that only moves when told to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ManualClock {
    now: Duration,
}

impl ManualClock {
    /// Creates a clock reading the provided offset.
    #[must_use]
    pub const fn at(now: Duration) -> Self {
        Self { now }
    }

    /// Moves the clock forward by `delta`.
    pub fn advance(&mut self, delta: Duration) {
        self.now = self.now.saturating_add(delta);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_moves_only_when_advanced() {
        let mut clock = ManualClock::at(Duration::from_millis(200));
        assert_eq!(clock.now(), Duration::from_millis(200));

        clock.advance(Duration::from_millis(50));
        assert_eq!(clock.now(), Duration::from_millis(250));
    }

    #[test]
    fn manual_clock_saturates_instead_of_overflowing() {
        let mut clock = ManualClock::at(Duration::MAX);
        clock.advance(Duration::from_millis(1));
        assert_eq!(clock.now(), Duration::MAX);
    }

    #[test]
    fn monotonic_clock_is_non_decreasing() {
        let clock = MonotonicClock::start();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
