// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Sockets: the attach points parts snap into.
//!
//! A socket accepts at most one part in its lifetime. The interaction
//! layer talks to it only through [`SocketInteractor`]: it may query
//! `accepts` as often as it likes, then `commit` once.

use super::part::{Part, TimingCue};
use super::pose::Pose;
use super::{GroupIndex, PartIndex};
use crate::error::Fault;
use crate::timing::Debounce;

/// Capability interface the interaction layer calls through
pub trait SocketInteractor {
    /// Side-effect-free compatibility check.
    ///
    /// True iff the socket is active, unoccupied, and the candidate
    /// belongs to its group (and slot, when one is designated).
    fn accepts(&self, index: PartIndex, part: &Part) -> bool;

    /// Take the part for good.
    ///
    /// On success the part is Assembled, snapped to the attach pose, and
    /// the socket is occupied and inactive. On failure nothing changes.
    fn commit(&mut self, index: PartIndex, part: &mut Part) -> Result<TimingCue, Fault>;

    /// A candidate left the socket volume at `now`.
    fn on_exit(&mut self, index: PartIndex, now: f64) -> Result<(), Fault>;
}

/// An attach point for one part of a group
#[derive(Debug, Clone)]
pub struct Socket {
    /// Socket name
    name: String,
    /// Group whose parts it accepts
    group: GroupIndex,
    /// Designated part, when paired 1:1
    slot: Option<PartIndex>,
    /// Whether selection is currently enabled
    active: bool,
    /// Part taken, if any
    occupant: Option<PartIndex>,
    /// Candidate currently inside the socket volume
    hover: Option<PartIndex>,
    /// Canonical attach pose
    attach: Option<Pose>,
    /// Scale applied to the part on attach
    scale_multiplier: Option<[f32; 3]>,
    /// Exit event debouncer
    exit_debounce: Debounce,
}

impl Socket {
    /// Create a new inactive socket for a group
    pub fn new(name: impl Into<String>, group: GroupIndex) -> Self {
        Self {
            name: name.into(),
            group,
            slot: None,
            active: false,
            occupant: None,
            hover: None,
            attach: None,
            scale_multiplier: None,
            exit_debounce: Debounce::default(),
        }
    }

    /// Builder: pair with a single part
    pub fn with_slot(mut self, part: PartIndex) -> Self {
        self.slot = Some(part);
        self
    }

    /// Builder: set attach pose
    pub fn with_attach(mut self, pose: Pose) -> Self {
        self.attach = Some(pose);
        self
    }

    /// Builder: set scale multiplier
    pub fn with_scale_multiplier(mut self, multiplier: [f32; 3]) -> Self {
        self.scale_multiplier = Some(multiplier);
        self
    }

    /// Builder: set exit debounce window in seconds
    pub fn with_exit_debounce(mut self, window: f64) -> Self {
        self.exit_debounce = Debounce::new(window);
        self
    }

    /// Get socket name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get accepted group
    pub fn group(&self) -> GroupIndex {
        self.group
    }

    /// Get designated part
    pub fn slot(&self) -> Option<PartIndex> {
        self.slot
    }

    /// Whether selection is enabled
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether a part has been taken
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Part taken, if any
    pub fn occupant(&self) -> Option<PartIndex> {
        self.occupant
    }

    /// Candidate currently hovering
    pub fn hover(&self) -> Option<PartIndex> {
        self.hover
    }

    /// Get attach pose
    pub fn attach(&self) -> Option<&Pose> {
        self.attach.as_ref()
    }

    /// Whether this socket can ever take the given part
    pub fn is_meant_for(&self, index: PartIndex, part: &Part) -> bool {
        part.group() == self.group && self.slot.map_or(true, |slot| slot == index)
    }

    /// Enable selection. Occupied sockets never reopen.
    pub fn activate(&mut self) {
        if self.occupant.is_none() {
            self.active = true;
        }
    }

    /// A candidate entered the socket volume
    pub fn on_enter(&mut self, index: PartIndex) -> Result<(), Fault> {
        if self.is_occupied() {
            return Err(Fault::SocketOccupied {
                socket: self.name.clone(),
            });
        }
        self.hover = Some(index);
        Ok(())
    }

    /// Drop a candidate that was turned away
    pub fn clear_hover(&mut self, index: PartIndex) {
        if self.hover == Some(index) {
            self.hover = None;
        }
    }

    fn vet(&self, index: PartIndex, part: &Part) -> Result<(), Fault> {
        if !self.is_meant_for(index, part) {
            return Err(Fault::Mismatch {
                socket: self.name.clone(),
                part: part.id().to_string(),
            });
        }
        if self.is_occupied() {
            return Err(Fault::SocketOccupied {
                socket: self.name.clone(),
            });
        }
        if !self.active {
            return Err(Fault::SocketInactive {
                socket: self.name.clone(),
            });
        }
        Ok(())
    }

    fn snap(&self, part: &mut Part) {
        match &self.attach {
            Some(attach) => part.snap_to(attach, self.scale_multiplier),
            None => tracing::warn!(
                socket = %self.name,
                "Socket is missing an attach pose, snapping skipped"
            ),
        }
    }
}

impl SocketInteractor for Socket {
    fn accepts(&self, index: PartIndex, part: &Part) -> bool {
        self.vet(index, part).is_ok()
    }

    fn commit(&mut self, index: PartIndex, part: &mut Part) -> Result<TimingCue, Fault> {
        self.vet(index, part)?;
        let cue = part.on_assembled()?;

        self.occupant = Some(index);
        self.snap(part);
        self.active = false;
        self.hover = None;

        tracing::info!(socket = %self.name, part = %part.id(), "Part assembled into socket");
        Ok(cue)
    }

    fn on_exit(&mut self, index: PartIndex, now: f64) -> Result<(), Fault> {
        if self.is_occupied() {
            return Err(Fault::SocketOccupied {
                socket: self.name.clone(),
            });
        }

        self.exit_debounce.admit(now).map_err(|elapsed| Fault::Debounced {
            socket: self.name.clone(),
            elapsed,
        })?;

        if self.hover == Some(index) {
            self.hover = None;
        }
        Ok(())
    }
}
