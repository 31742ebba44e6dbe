#![forbid(unsafe_code)]

//! Monotonic clock abstraction.
//!
//! The controller never reads the wall clock itself; every time-dependent
//! call takes `now` as a [`Duration`] since an arbitrary session epoch.
//! Hosts get that value from a [`MonotonicClock`].

use std::cell::Cell;
use std::time::Duration;

/// Monotonic clock.
///
/// Browser hosts push the page's `performance.now()` timestamps into a
/// [`ManualClock`].
pub trait MonotonicClock {
    /// Elapsed time since an unspecified epoch, monotonically increasing.
    fn now_mono(&self) -> Duration;
}

/// Host- or test-driven clock.
///
/// Interior mutability lets a shared reference advance time while the
/// controller holds another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Cell::new(Duration::ZERO),
        }
    }

    /// Set current monotonic time. Earlier values are ignored.
    pub fn set(&self, now: Duration) {
        if now > self.now.get() {
            self.now.set(now);
        }
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&self, dt: Duration) {
        self.now.set(self.now.get().saturating_add(dt));
    }
}

impl MonotonicClock for ManualClock {
    fn now_mono(&self) -> Duration {
        self.now.get()
    }
}
