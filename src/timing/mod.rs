// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Timing module.
//!
//! This module provides the clock abstraction, exit-event debouncing,
//! and the per-part duration recorder.

pub mod clock;
pub mod debounce;
pub mod recorder;

pub use clock::{Clock, ManualClock, SystemClock};
pub use debounce::{Debounce, DEFAULT_DEBOUNCE_WINDOW};
pub use recorder::{group_rank, TimingEntry, TimingModel, TimingRecorder, TimingReport};
