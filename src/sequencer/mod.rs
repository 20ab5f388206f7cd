// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Sequencing core.
//!
//! This module provides:
//! - The unlock queue deciding which unit is interactive
//! - The session that routes events and applies follow-ups
//! - Building a session from a description
//! - Scripted replay of interaction events

pub mod builder;
pub mod queue;
pub mod script;
pub mod session;

pub use builder::{Layout, SessionBuilder};
pub use queue::{Sequencer, SequencerState, Step};
pub use script::{EventKind, ReplayScript, ScriptStep};
pub use session::{Interaction, Session};
