// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Parts and their lifecycle.
//!
//! A Part is one physical piece. It moves Locked -> Unlocked -> Assembled
//! through [`Part::set_state`] and never goes back. Instead of notifying
//! its group, every transition returns a [`TimingCue`] telling the owner
//! which follow-up to perform.

use super::pose::{scale_by, Pose};
use super::{AssemblyState, GroupIndex};
use crate::error::Fault;

/// Interaction affordance granted to the external grab handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    /// Cannot be picked up
    Locked,
    /// Can be grabbed and moved freely
    Grabbable,
    /// Snapped into a socket; interaction disabled for good
    Fixed,
}

/// Follow-up the owner of a part performs after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingCue {
    /// Part became Unlocked: a timing window may open
    Start,
    /// Part became Assembled: its timing window closes
    Stop,
}

/// A single physical piece
#[derive(Debug, Clone)]
pub struct Part {
    /// Unique part id
    id: String,
    /// Id of the owning group
    group_id: String,
    /// Owning group
    group: GroupIndex,
    /// Lifecycle state
    state: AssemblyState,
    /// Current interaction affordance
    affordance: Affordance,
    /// Whether the interaction layer currently holds it
    held: bool,
    /// Current pose
    pose: Pose,
    /// Scale before the first socket resize
    original_scale: Option<[f32; 3]>,
}

impl Part {
    /// Create a new locked part
    pub fn new(id: impl Into<String>, group_id: impl Into<String>, group: GroupIndex) -> Self {
        Self {
            id: id.into(),
            group_id: group_id.into(),
            group,
            state: AssemblyState::Locked,
            affordance: Affordance::Locked,
            held: false,
            pose: Pose::default(),
            original_scale: None,
        }
    }

    /// Get part id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get owning group id
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// Get owning group index
    pub fn group(&self) -> GroupIndex {
        self.group
    }

    /// Get lifecycle state
    pub fn state(&self) -> AssemblyState {
        self.state
    }

    /// Get interaction affordance
    pub fn affordance(&self) -> Affordance {
        self.affordance
    }

    /// Whether the part is currently held
    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Get current pose
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Scale stored before the first resize, if any
    pub fn original_scale(&self) -> Option<[f32; 3]> {
        self.original_scale
    }

    /// Builder: set the initial pose
    pub fn with_pose(mut self, pose: Pose) -> Self {
        self.pose = pose;
        self
    }

    /// Single entry point for state changes.
    ///
    /// Only Locked -> Unlocked and Unlocked -> Assembled are defined. The
    /// affordance follows the new state.
    pub fn set_state(&mut self, new_state: AssemblyState) -> Result<TimingCue, Fault> {
        let cue = match (self.state, new_state) {
            (AssemblyState::Locked, AssemblyState::Unlocked) => {
                self.affordance = Affordance::Grabbable;
                TimingCue::Start
            }
            (AssemblyState::Unlocked, AssemblyState::Assembled) => {
                self.affordance = Affordance::Fixed;
                self.held = false;
                TimingCue::Stop
            }
            (from, to) => {
                return Err(Fault::InvalidTransition {
                    part: self.id.clone(),
                    from,
                    to,
                })
            }
        };

        self.state = new_state;
        tracing::debug!(part = %self.id, state = ?self.state, "Part state changed");
        Ok(cue)
    }

    /// Mark the part assembled. Only valid while Unlocked.
    pub fn on_assembled(&mut self) -> Result<TimingCue, Fault> {
        if self.state != AssemblyState::Unlocked {
            return Err(Fault::PartNotUnlocked {
                part: self.id.clone(),
                state: self.state,
            });
        }
        self.set_state(AssemblyState::Assembled)
    }

    /// Grab the part
    pub fn grab(&mut self) -> Result<(), Fault> {
        if self.affordance != Affordance::Grabbable {
            return Err(Fault::NotGrabbable {
                part: self.id.clone(),
            });
        }
        self.held = true;
        Ok(())
    }

    /// Let go of the part
    pub fn release(&mut self) {
        self.held = false;
    }

    /// Move the part onto an attach pose, optionally rescaling it.
    ///
    /// The original scale is captured once, so repeated resizes never
    /// compound.
    pub fn snap_to(&mut self, attach: &Pose, scale_multiplier: Option<[f32; 3]>) {
        self.pose.position = attach.position;
        self.pose.rotation = attach.rotation;

        if let Some(multiplier) = scale_multiplier {
            let original = *self.original_scale.get_or_insert(self.pose.scale);
            self.pose.scale = scale_by(original, multiplier);
        }
    }
}
