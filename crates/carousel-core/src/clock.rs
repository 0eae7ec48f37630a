#![forbid(unsafe_code)]

//! Monotonic clocks.
//!
//! The engine never reads time on its own; hosts pass `now` into every
//! time-sensitive call. [`DeterministicClock`] is advanced explicitly (tests,
//! replay). [`SystemClock`] reads `web_time::Instant`, which maps to
//! `performance.now()` on `wasm32-unknown-unknown`.

use std::time::Duration;

use web_time::Instant;

/// Where a registry reads `now` from when the host does not pass it.
pub trait Clock {
    fn now_mono(&self) -> Duration;
}

/// Hand-driven time for replaying host event logs and for tests: it only
/// moves when [`set`](Self::set) or [`advance`](Self::advance) is called.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Jump to `now`.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

impl Clock for DeterministicClock {
    fn now_mono(&self) -> Duration {
        self.now
    }
}

/// Wall-clock-backed monotonic time.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_mono(&self) -> Duration {
        self.origin.elapsed()
    }
}
