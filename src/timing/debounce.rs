// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Debouncing of rapid repeated events.

/// Default minimum spacing between two processed events, in seconds
pub const DEFAULT_DEBOUNCE_WINDOW: f64 = 0.5;

/// Admits an event only if enough time passed since the last admitted one.
///
/// Rejected events do not move the window.
#[derive(Debug, Clone)]
pub struct Debounce {
    /// Minimum spacing in seconds
    window: f64,
    /// Time of the last admitted event
    last: Option<f64>,
}

impl Debounce {
    /// Create a debouncer with the given window in seconds
    pub fn new(window: f64) -> Self {
        Self {
            window: window.max(0.0),
            last: None,
        }
    }

    /// Try to admit an event at `now`.
    ///
    /// Returns the time elapsed since the last admitted event when the
    /// event falls inside the window.
    pub fn admit(&mut self, now: f64) -> Result<(), f64> {
        if let Some(last) = self.last {
            let elapsed = now - last;
            if elapsed < self.window {
                return Err(elapsed);
            }
        }
        self.last = Some(now);
        Ok(())
    }
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_WINDOW)
    }
}
