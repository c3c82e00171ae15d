//! Clock sources for stamping.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crate::core::Clock;

/// Wall clock: nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ns(&self) -> u64 {
        unix_nanos(SystemTime::now())
    }
}

/// Monotonic clock anchored to the wall clock at construction.
///
/// Readings advance with [`Instant`], so a wall-clock step during a
/// measurement cannot make T3 precede T2.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    anchor: Instant,
    base_ns: u64,
}

impl MonotonicClock {
    /// Anchor to the current wall-clock time.
    pub fn new() -> Self {
        Self {
            anchor: Instant::now(),
            base_ns: unix_nanos(SystemTime::now()),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ns(&self) -> u64 {
        let elapsed = u64::try_from(self.anchor.elapsed().as_nanos()).unwrap_or(u64::MAX);
        self.base_ns.saturating_add(elapsed)
    }
}

/// Manually driven clock for tests and simulations.
///
/// Each reading advances the clock by a fixed step, so consecutive stamps
/// differ deterministically.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
    step: u64,
}

impl ManualClock {
    /// Start at `start_ns`, advancing `step_ns` after every reading.
    pub fn new(start_ns: u64, step_ns: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ns),
            step: step_ns,
        }
    }

    /// Set the next reading.
    pub fn set(&self, now_ns: u64) {
        self.now.store(now_ns, Ordering::SeqCst);
    }

    /// Peek at the next reading without advancing.
    pub fn peek(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

impl Clock for ManualClock {
    fn now_ns(&self) -> u64 {
        self.now.fetch_add(self.step, Ordering::SeqCst)
    }
}

fn unix_nanos(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
