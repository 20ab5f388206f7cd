// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Guided, ordered assembly of multi-part objects.
//!
//! Parts are organised into groups, groups unlock one at a time, and each
//! part is timed from when it becomes available until it is fixed into a
//! socket. The [`sequencer::Session`] owns everything and is driven by
//! grab, hover, and release events from a front end or a replay script.

pub mod assembly;
pub mod config;
pub mod error;
pub mod instructions;
pub mod recording;
pub mod sequencer;
pub mod timing;
pub mod ui;

pub use error::{AssemblyError, AssemblyResult, Fault, Severity};
