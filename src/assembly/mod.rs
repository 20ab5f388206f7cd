// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Assembly entities.
//!
//! This module provides:
//! - Parts: the state-holding pieces that get assembled
//! - Sockets: validate and accept a single compatible part
//! - Groups: ordered sets of parts and sockets that complete together
//!
//! Entities live in arenas owned by the session and refer to each other
//! through the index types below.

pub mod group;
pub mod part;
pub mod pose;
pub mod socket;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use group::{Group, GroupPhase, GroupProgress};
pub use part::{Affordance, Part, TimingCue};
pub use pose::Pose;
pub use socket::{Socket, SocketInteractor};

/// Lifecycle of a part. Transitions are monotonic: Locked, Unlocked, Assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssemblyState {
    /// Not yet available for interaction
    Locked,
    /// Available to grab and insert
    Unlocked,
    /// Fixed in its socket; terminal
    Assembled,
}

impl Default for AssemblyState {
    fn default() -> Self {
        AssemblyState::Locked
    }
}

/// Index of a part in the session arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartIndex(pub usize);

/// Index of a socket in the session arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SocketIndex(pub usize);

/// Index of a group in the session arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupIndex(pub usize);

/// What the sequencer unlocks as one atomic step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    /// A whole group (grouped mode)
    Group(GroupIndex),
    /// A single part (flat mode)
    Part(PartIndex),
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Group(g) => write!(f, "group #{}", g.0),
            Unit::Part(p) => write!(f, "part #{}", p.0),
        }
    }
}

/// Unit of work granularity for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceMode {
    /// Whole groups unlock at once
    Grouped,
    /// One part unlocks at a time
    Flat,
}

impl Default for SequenceMode {
    fn default() -> Self {
        SequenceMode::Grouped
    }
}
