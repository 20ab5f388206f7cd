// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Monotonic time sources.
//!
//! Every timestamp in the engine is seconds as `f64`, read from a [`Clock`]
//! once per external event.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Monotonic time source in seconds
pub trait Clock {
    /// Seconds since the clock's origin
    fn now(&self) -> f64;
}

/// Wall clock anchored at creation
#[derive(Debug, Clone)]
pub struct SystemClock {
    /// Time origin
    origin: Instant,
}

impl SystemClock {
    /// Create a clock starting at zero now
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
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Settable clock shared between a session and its driver.
///
/// Clones share the same time, so a test or replay keeps one handle and
/// gives another to the session.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    /// Current time in seconds
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    /// Create a clock at the given time
    pub fn new(start: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    /// Jump to a time. Earlier times are ignored.
    pub fn set(&self, seconds: f64) {
        if seconds >= self.now.get() {
            self.now.set(seconds);
        } else {
            tracing::warn!(
                requested = seconds,
                current = self.now.get(),
                "Ignoring attempt to move the clock backwards"
            );
        }
    }

    /// Move forward by a number of seconds
    pub fn advance(&self, seconds: f64) {
        self.set(self.now.get() + seconds.max(0.0));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(a >= 0.0);
        assert!(b >= a);
    }

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::new(1.0);
        let handle = clock.clone();

        handle.advance(0.5);
        assert_eq!(clock.now(), 1.5);

        handle.set(3.0);
        assert_eq!(clock.now(), 3.0);
    }

    #[test]
    fn test_manual_clock_never_goes_back() {
        let clock = ManualClock::new(2.0);
        clock.set(1.0);
        assert_eq!(clock.now(), 2.0);

        clock.advance(-1.0);
        assert_eq!(clock.now(), 2.0);
    }
}
