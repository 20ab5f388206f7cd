// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Groups of parts that are assembled together.

use super::part::{Part, TimingCue};
use super::socket::Socket;
use super::{AssemblyState, PartIndex, SocketIndex};
use crate::error::Fault;

/// Lifecycle of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupPhase {
    /// Waiting in the queue
    Locked,
    /// Parts may be assembled
    Unlocked,
    /// Every part assembled
    Complete,
}

/// Result of recording one assembled part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupProgress {
    /// More parts to go
    Partial {
        /// Parts assembled so far
        assembled: usize,
        /// Parts in the group
        total: usize,
    },
    /// The last part just landed. Reported exactly once.
    Completed,
}

/// An ordered set of parts plus the sockets that take them
#[derive(Debug, Clone)]
pub struct Group {
    /// Group id
    id: String,
    /// Owned parts, in declaration order
    parts: Vec<PartIndex>,
    /// Owned sockets
    sockets: Vec<SocketIndex>,
    /// Parts assembled so far, never above `parts.len()`
    assembled: usize,
    /// Lifecycle phase
    phase: GroupPhase,
}

impl Group {
    /// Create a new locked group
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parts: Vec::new(),
            sockets: Vec::new(),
            assembled: 0,
            phase: GroupPhase::Locked,
        }
    }

    /// Get group id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get owned parts
    pub fn parts(&self) -> &[PartIndex] {
        &self.parts
    }

    /// Get owned sockets
    pub fn sockets(&self) -> &[SocketIndex] {
        &self.sockets
    }

    /// Add a part
    pub fn add_part(&mut self, part: PartIndex) {
        self.parts.push(part);
    }

    /// Add a socket
    pub fn add_socket(&mut self, socket: SocketIndex) {
        self.sockets.push(socket);
    }

    /// Parts assembled so far
    pub fn assembled_count(&self) -> usize {
        self.assembled
    }

    /// Number of parts
    pub fn total(&self) -> usize {
        self.parts.len()
    }

    /// Get phase
    pub fn phase(&self) -> GroupPhase {
        self.phase
    }

    /// Whether every part is assembled
    pub fn is_complete(&self) -> bool {
        self.assembled == self.parts.len()
    }

    /// Mark the group open without touching its parts.
    ///
    /// Returns true the first time. Used when parts unlock one by one.
    pub fn open(&mut self) -> bool {
        if self.phase == GroupPhase::Locked {
            self.phase = GroupPhase::Unlocked;
            tracing::info!(group = %self.id, "Group opened");
            true
        } else {
            false
        }
    }

    /// Unlock every part and activate every socket.
    ///
    /// A group unlocks at most once. Returns the cue of each part that
    /// changed state.
    pub fn unlock(
        &mut self,
        parts: &mut [Part],
        sockets: &mut [Socket],
    ) -> Result<Vec<(PartIndex, TimingCue)>, Fault> {
        if self.phase != GroupPhase::Locked {
            return Err(Fault::AlreadyUnlocked {
                group: self.id.clone(),
            });
        }
        self.phase = GroupPhase::Unlocked;

        let mut cues = Vec::with_capacity(self.parts.len());
        for &index in &self.parts {
            let part = &mut parts[index.0];
            if part.state() != AssemblyState::Locked {
                continue;
            }
            match part.set_state(AssemblyState::Unlocked) {
                Ok(cue) => cues.push((index, cue)),
                Err(fault) => fault.log(),
            }
        }

        for &index in &self.sockets {
            sockets[index.0].activate();
        }

        tracing::info!(group = %self.id, parts = self.parts.len(), "Group unlocked");
        Ok(cues)
    }

    /// Record one assembled part.
    ///
    /// Extra notifications are clamped and reported as a fault; they never
    /// produce a second `Completed`.
    pub fn on_part_assembled(&mut self) -> Result<GroupProgress, Fault> {
        let total = self.parts.len();
        if self.phase == GroupPhase::Complete || self.assembled >= total {
            self.assembled = total;
            return Err(Fault::CountOverflow {
                group: self.id.clone(),
                total,
            });
        }

        self.assembled += 1;
        tracing::info!(
            group = %self.id,
            "{}/{} parts assembled",
            self.assembled,
            total
        );

        if self.assembled == total {
            self.phase = GroupPhase::Complete;
            tracing::info!(group = %self.id, "All parts assembled");
            Ok(GroupProgress::Completed)
        } else {
            Ok(GroupProgress::Partial {
                assembled: self.assembled,
                total,
            })
        }
    }
}
