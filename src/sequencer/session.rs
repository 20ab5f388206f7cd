// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Assembly session.
//!
//! The session owns every arena and collaborator and is the only place
//! follow-ups are applied: a [`Step`] from the sequencer, a [`TimingCue`]
//! from a part, a [`GroupProgress`] from a group. External events arrive
//! one at a time, each reading the clock once.

use std::collections::HashMap;

use crate::assembly::{
    AssemblyState, Group, GroupIndex, GroupProgress, Part, PartIndex, SequenceMode, Socket,
    SocketIndex, SocketInteractor, TimingCue, Unit,
};
use crate::error::Fault;
use crate::instructions::{InstructionDisplay, InstructionSource};
use crate::recording::TimingSink;
use crate::timing::{Clock, TimingEntry, TimingModel, TimingRecorder, TimingReport};

use super::builder::Layout;
use super::queue::{Sequencer, Step};

/// Outcome of one external event
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    /// The part is now held
    Grabbed {
        /// Part index
        part: PartIndex,
    },
    /// The part is hovering over a socket
    Hovering {
        /// Part index
        part: PartIndex,
        /// Socket index
        socket: SocketIndex,
    },
    /// The part left a socket volume
    Exited {
        /// Part index
        part: PartIndex,
        /// Socket index
        socket: SocketIndex,
    },
    /// The part was released away from any socket
    Released {
        /// Part index
        part: PartIndex,
    },
    /// The part was fixed into a socket
    Assembled {
        /// Part index
        part: PartIndex,
        /// Socket index
        socket: SocketIndex,
        /// This part completed its group
        group_completed: bool,
        /// This part completed the whole assembly
        finished: bool,
    },
    /// The socket turned the part away; it is free again
    Rejected {
        /// Part index
        part: PartIndex,
        /// Socket index
        socket: SocketIndex,
        /// Reason
        fault: Fault,
    },
    /// The event had no effect
    Ignored(Fault),
}

impl Interaction {
    /// Whether a part was assembled
    pub fn is_assembled(&self) -> bool {
        matches!(self, Interaction::Assembled { .. })
    }

    /// Fault carried by a rejection or ignored event
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            Interaction::Rejected { fault, .. } | Interaction::Ignored(fault) => Some(fault),
            _ => None,
        }
    }
}

/// A running assembly exercise
pub struct Session {
    /// Exercise name
    name: String,
    /// Unit of work granularity
    mode: SequenceMode,
    /// Part arena
    parts: Vec<Part>,
    /// Socket arena
    sockets: Vec<Socket>,
    /// Group arena
    groups: Vec<Group>,
    /// Part id to index
    part_ids: HashMap<String, PartIndex>,
    /// Socket name to index
    socket_ids: HashMap<String, SocketIndex>,
    /// Group id to index
    group_ids: HashMap<String, GroupIndex>,
    /// Unlock order
    ordering: Vec<Unit>,
    /// Unlock queue
    sequencer: Sequencer,
    /// Duration bookkeeping
    recorder: TimingRecorder,
    /// Time source
    clock: Box<dyn Clock>,
    /// Instruction lookup
    instructions: Box<dyn InstructionSource>,
    /// Instruction display
    display: Box<dyn InstructionDisplay>,
    /// Timing persistence
    sink: Option<Box<dyn TimingSink>>,
    /// Units unlocked so far
    unlocks: usize,
}

impl Session {
    pub(super) fn new(
        layout: Layout,
        timing: TimingModel,
        clock: Box<dyn Clock>,
        instructions: Box<dyn InstructionSource>,
        display: Box<dyn InstructionDisplay>,
        sink: Option<Box<dyn TimingSink>>,
    ) -> Self {
        Self {
            name: layout.name,
            mode: layout.mode,
            parts: layout.parts,
            sockets: layout.sockets,
            groups: layout.groups,
            part_ids: layout.part_ids,
            socket_ids: layout.socket_ids,
            group_ids: layout.group_ids,
            ordering: layout.ordering,
            sequencer: Sequencer::new(),
            recorder: TimingRecorder::new(timing),
            clock,
            instructions,
            display,
            sink,
            unlocks: 0,
        }
    }

    /// Load the ordering and unlock the first unit
    pub fn start(&mut self) -> Step {
        tracing::info!(
            assembly = %self.name,
            mode = ?self.mode,
            units = self.ordering.len(),
            "Starting assembly session"
        );
        let step = self.sequencer.initialize(self.ordering.clone());
        self.apply(step);
        step
    }

    // Events

    /// A grab began on a part
    pub fn grab_begin(&mut self, part: PartIndex) -> Interaction {
        let Some(target) = self.parts.get_mut(part.0) else {
            return ignored(unknown_part(part));
        };
        match target.grab() {
            Ok(()) => {
                tracing::debug!(part = %target.id(), "Part grabbed");
                Interaction::Grabbed { part }
            }
            Err(fault) => ignored(fault),
        }
    }

    /// A held part entered a socket volume. Sockets only register parts
    /// they are meant for.
    pub fn enter_socket(&mut self, socket: SocketIndex, part: PartIndex) -> Interaction {
        if let Err(fault) = self.check(socket, part) {
            return ignored(fault);
        }
        let candidate = &self.parts[part.0];
        let target = &self.sockets[socket.0];
        if !target.is_meant_for(part, candidate) {
            return ignored(Fault::Mismatch {
                socket: target.name().to_string(),
                part: candidate.id().to_string(),
            });
        }
        match self.sockets[socket.0].on_enter(part) {
            Ok(()) => Interaction::Hovering { part, socket },
            Err(fault) => ignored(fault),
        }
    }

    /// A part left a socket volume. Exits are debounced per socket.
    pub fn exit_socket(&mut self, socket: SocketIndex, part: PartIndex) -> Interaction {
        if let Err(fault) = self.check(socket, part) {
            return ignored(fault);
        }
        let now = self.clock.now();
        match self.sockets[socket.0].on_exit(part, now) {
            Ok(()) => Interaction::Exited { part, socket },
            Err(fault) => ignored(fault),
        }
    }

    /// A grab ended. A part hovering over a socket is committed into it.
    ///
    /// A hovered socket that accepts the part wins over one that does not.
    pub fn grab_release(&mut self, part: PartIndex) -> Interaction {
        let Some(target) = self.parts.get_mut(part.0) else {
            return ignored(unknown_part(part));
        };
        target.release();

        let candidate = &self.parts[part.0];
        let hovered: Vec<usize> = self
            .sockets
            .iter()
            .enumerate()
            .filter(|(_, s)| s.hover() == Some(part))
            .map(|(index, _)| index)
            .collect();
        let chosen = hovered
            .iter()
            .copied()
            .find(|&index| self.sockets[index].accepts(part, candidate))
            .or_else(|| hovered.first().copied());

        let Some(chosen) = chosen else {
            return Interaction::Released { part };
        };
        for index in hovered.into_iter().filter(|&index| index != chosen) {
            self.sockets[index].clear_hover(part);
        }
        self.commit(SocketIndex(chosen), part)
    }

    /// Drop a part straight into a socket
    pub fn insert(&mut self, socket: SocketIndex, part: PartIndex) -> Interaction {
        if let Err(fault) = self.check(socket, part) {
            return ignored(fault);
        }
        self.commit(socket, part)
    }

    fn check(&self, socket: SocketIndex, part: PartIndex) -> Result<(), Fault> {
        if part.0 >= self.parts.len() {
            return Err(unknown_part(part));
        }
        if socket.0 >= self.sockets.len() {
            return Err(Fault::Unknown {
                kind: "socket",
                id: format!("#{}", socket.0),
            });
        }
        Ok(())
    }

    fn commit(&mut self, socket: SocketIndex, part: PartIndex) -> Interaction {
        let now = self.clock.now();
        let result = self.sockets[socket.0].commit(part, &mut self.parts[part.0]);

        let cue = match result {
            Ok(cue) => cue,
            Err(fault) => {
                fault.log();
                return match fault {
                    Fault::Mismatch { .. }
                    | Fault::SocketOccupied { .. }
                    | Fault::SocketInactive { .. } => {
                        self.parts[part.0].release();
                        self.sockets[socket.0].clear_hover(part);
                        Interaction::Rejected {
                            part,
                            socket,
                            fault,
                        }
                    }
                    other => Interaction::Ignored(other),
                };
            }
        };

        self.on_cue(part, cue, now);

        let group = self.parts[part.0].group();
        let group_completed = match self.groups[group.0].on_part_assembled() {
            Ok(GroupProgress::Completed) => true,
            Ok(GroupProgress::Partial { .. }) => false,
            Err(fault) => {
                fault.log();
                false
            }
        };

        let completed_unit = match self.mode {
            SequenceMode::Grouped => group_completed.then_some(Unit::Group(group)),
            SequenceMode::Flat => Some(Unit::Part(part)),
        };
        if let Some(unit) = completed_unit {
            match self.sequencer.on_unit_completed(unit) {
                Ok(step) => self.apply(step),
                Err(fault) => fault.log(),
            }
        }

        Interaction::Assembled {
            part,
            socket,
            group_completed,
            finished: self.sequencer.is_finished(),
        }
    }

    // Follow-ups

    fn apply(&mut self, step: Step) {
        match step {
            Step::Unlock(unit) => self.unlock(unit),
            Step::Finished => {
                self.display.display_default();
                tracing::info!(
                    assembly = %self.name,
                    total = self.recorder.total(),
                    "Assembly complete"
                );
            }
            Step::Idle => {}
        }
    }

    fn unlock(&mut self, unit: Unit) {
        let now = self.clock.now();
        self.unlocks += 1;

        match unit {
            Unit::Group(group) => {
                let cues = match self.groups[group.0].unlock(&mut self.parts, &mut self.sockets) {
                    Ok(cues) => cues,
                    Err(fault) => {
                        fault.log();
                        return;
                    }
                };
                self.start_group_interval(group, now);
                for (part, cue) in cues {
                    self.on_cue(part, cue, now);
                }
                self.show_instruction(group);
            }
            Unit::Part(part) => {
                let group = self.parts[part.0].group();
                if self.groups[group.0].open() {
                    self.start_group_interval(group, now);
                    self.show_instruction(group);
                }

                match self.parts[part.0].set_state(AssemblyState::Unlocked) {
                    Ok(cue) => self.on_cue(part, cue, now),
                    Err(fault) => fault.log(),
                }

                let target = &self.parts[part.0];
                for &index in self.groups[group.0].sockets() {
                    let socket = &mut self.sockets[index.0];
                    if socket.is_meant_for(part, target) {
                        socket.activate();
                    }
                }
                tracing::info!(part = %target.id(), "Part unlocked");
            }
        }
    }

    fn start_group_interval(&mut self, group: GroupIndex, now: f64) {
        if self.recorder.model() == TimingModel::PerGroupInterval {
            self.recorder.start(self.groups[group.0].id(), now);
        }
    }

    fn on_cue(&mut self, part: PartIndex, cue: TimingCue, now: f64) {
        match cue {
            TimingCue::Start => {
                if self.recorder.model() == TimingModel::PerPartAbsolute {
                    self.recorder.start(self.parts[part.0].id(), now);
                }
            }
            TimingCue::Stop => {
                let target = &self.parts[part.0];
                match self.recorder.stop(target.group_id(), target.id(), now) {
                    Ok(entry) => self.persist(&entry),
                    Err(fault) => fault.log(),
                }
            }
        }
    }

    fn persist(&mut self, entry: &TimingEntry) {
        if let Some(sink) = self.sink.as_mut() {
            if let Err(e) = sink.append(entry) {
                tracing::warn!(
                    group = %entry.group_id,
                    part = %entry.part_id,
                    "Failed to persist timing entry: {}",
                    e
                );
            }
        }
    }

    fn show_instruction(&mut self, group: GroupIndex) {
        let group_id = self.groups[group.0].id();
        match self.instructions.instruction(group_id) {
            Some(instruction) => self.display.display(&instruction.title, &instruction.text),
            None => self.display.display_default(),
        }
    }

    /// Swap the instruction source. The head group's text is shown again.
    pub fn replace_instructions(&mut self, source: Box<dyn InstructionSource>) {
        self.instructions = source;
        if let Some(group) = self.head_group() {
            self.show_instruction(group);
        }
    }

    // Queries

    /// Get exercise name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get sequencing mode
    pub fn mode(&self) -> SequenceMode {
        self.mode
    }

    /// Current session time
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// All parts
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// All sockets
    pub fn sockets(&self) -> &[Socket] {
        &self.sockets
    }

    /// All groups
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Part by index
    pub fn part(&self, index: PartIndex) -> Option<&Part> {
        self.parts.get(index.0)
    }

    /// Socket by index
    pub fn socket(&self, index: SocketIndex) -> Option<&Socket> {
        self.sockets.get(index.0)
    }

    /// Group by index
    pub fn group(&self, index: GroupIndex) -> Option<&Group> {
        self.groups.get(index.0)
    }

    /// Look up a part by id
    pub fn part_index(&self, id: &str) -> Option<PartIndex> {
        self.part_ids.get(id).copied()
    }

    /// Look up a socket by name
    pub fn socket_index(&self, name: &str) -> Option<SocketIndex> {
        self.socket_ids.get(name).copied()
    }

    /// Look up a group by id
    pub fn group_index(&self, id: &str) -> Option<GroupIndex> {
        self.group_ids.get(id).copied()
    }

    /// Unlock order
    pub fn ordering(&self) -> &[Unit] {
        &self.ordering
    }

    /// Get the unlock queue
    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    /// Get the duration recorder
    pub fn recorder(&self) -> &TimingRecorder {
        &self.recorder
    }

    /// Sorted report of the durations recorded this session
    pub fn report(&self) -> TimingReport {
        self.recorder.report()
    }

    /// Get the instruction display
    pub fn display(&self) -> &dyn InstructionDisplay {
        self.display.as_ref()
    }

    /// Whether every unit has been assembled
    pub fn is_finished(&self) -> bool {
        self.sequencer.is_finished()
    }

    /// Unit currently interactive
    pub fn active_unit(&self) -> Option<Unit> {
        self.sequencer.head()
    }

    /// Group the active unit belongs to
    pub fn head_group(&self) -> Option<GroupIndex> {
        match self.sequencer.head()? {
            Unit::Group(group) => Some(group),
            Unit::Part(part) => self.parts.get(part.0).map(Part::group),
        }
    }

    /// Number of unlocks performed
    pub fn unlock_count(&self) -> usize {
        self.unlocks
    }

    /// Human-readable name of a unit
    pub fn unit_label(&self, unit: Unit) -> String {
        match unit {
            Unit::Group(group) => self
                .groups
                .get(group.0)
                .map_or_else(|| unit.to_string(), |g| g.id().to_string()),
            Unit::Part(part) => self
                .parts
                .get(part.0)
                .map_or_else(|| unit.to_string(), |p| p.id().to_string()),
        }
    }

    /// Parts that are Unlocked and not yet assembled
    pub fn interactive_parts(&self) -> Vec<PartIndex> {
        self.parts
            .iter()
            .enumerate()
            .filter(|(_, part)| part.state() == AssemblyState::Unlocked)
            .map(|(i, _)| PartIndex(i))
            .collect()
    }

    /// Active sockets that would accept the given part
    pub fn sockets_accepting(&self, part: PartIndex) -> Vec<SocketIndex> {
        let Some(target) = self.parts.get(part.0) else {
            return Vec::new();
        };
        self.sockets
            .iter()
            .enumerate()
            .filter(|(_, socket)| socket.accepts(part, target))
            .map(|(i, _)| SocketIndex(i))
            .collect()
    }
}

fn unknown_part(part: PartIndex) -> Fault {
    Fault::Unknown {
        kind: "part",
        id: format!("#{}", part.0),
    }
}

fn ignored(fault: Fault) -> Interaction {
    fault.log();
    Interaction::Ignored(fault)
}
