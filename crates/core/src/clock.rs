// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Abstracts wall-clock access so the lifecycle engine's grace-interval and
//! timestamp logic can be driven deterministically under test.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

/// Source of the current time. Production code uses [`SystemClock`]; tests
/// use [`FakeClock`] to advance time deterministically.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current wall-clock time.
    fn now(&self) -> SystemTime;

    /// Current time in milliseconds since the Unix epoch.
    fn epoch_ms(&self) -> u64 {
        self.now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_millis() as u64
    }
}

/// Real wall-clock time via [`SystemTime::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

#[derive(Debug)]
struct FakeClockInner {
    now: SystemTime,
}

/// A controllable clock for tests: starts at the Unix epoch unless
/// constructed with [`FakeClock::at`], and only moves when told to.
#[derive(Debug, Clone)]
pub struct FakeClock {
    inner: Arc<Mutex<FakeClockInner>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::at(UNIX_EPOCH)
    }

    pub fn at(now: SystemTime) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeClockInner { now })),
        }
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let mut inner = self.inner.lock();
        inner.now += delta;
    }

    /// Set the clock to an absolute time.
    pub fn set(&self, now: SystemTime) {
        self.inner.lock().now = now;
    }

    /// Set the clock to an absolute offset (in milliseconds) from the epoch.
    pub fn set_epoch_ms(&self, epoch_ms: u64) {
        self.set(UNIX_EPOCH + Duration::from_millis(epoch_ms));
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> SystemTime {
        self.inner.lock().now
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
