// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Turning an assembly description into arenas and a session.
//!
//! Every string id is resolved to an index here, once. A typo in the
//! description is a construction-time error, never a silent runtime no-op.

use std::collections::{HashMap, HashSet};

use crate::assembly::{
    Group, GroupIndex, Part, PartIndex, SequenceMode, Socket, SocketIndex, Unit,
};
use crate::config::AssemblyFile;
use crate::error::{AssemblyError, AssemblyResult};
use crate::instructions::{InstructionDisplay, InstructionSource};
use crate::recording::TimingSink;
use crate::timing::{Clock, SystemClock, TimingModel};

use super::session::Session;

/// Resolved arenas and ordering of an assembly
#[derive(Debug, Clone)]
pub struct Layout {
    /// Exercise name
    pub name: String,
    /// Unit of work granularity
    pub mode: SequenceMode,
    /// Part arena
    pub parts: Vec<Part>,
    /// Socket arena
    pub sockets: Vec<Socket>,
    /// Group arena
    pub groups: Vec<Group>,
    /// Part id to index
    pub part_ids: HashMap<String, PartIndex>,
    /// Socket name to index
    pub socket_ids: HashMap<String, SocketIndex>,
    /// Group id to index
    pub group_ids: HashMap<String, GroupIndex>,
    /// Unlock order
    pub ordering: Vec<Unit>,
}

impl Layout {
    /// Resolve a description, checking every reference
    pub fn from_file(file: &AssemblyFile) -> AssemblyResult<Self> {
        let mut layout = Self {
            name: file.assembly.name.clone(),
            mode: file.assembly.mode,
            parts: Vec::with_capacity(file.part_count()),
            sockets: Vec::new(),
            groups: Vec::with_capacity(file.groups.len()),
            part_ids: HashMap::new(),
            socket_ids: HashMap::new(),
            group_ids: HashMap::new(),
            ordering: Vec::new(),
        };

        for config in &file.groups {
            let group_index = GroupIndex(layout.groups.len());
            if layout.group_ids.insert(config.id.clone(), group_index).is_some() {
                return Err(AssemblyError::DuplicateGroup {
                    id: config.id.clone(),
                });
            }
            if config.parts.is_empty() {
                return Err(AssemblyError::EmptyGroup {
                    id: config.id.clone(),
                });
            }

            let mut group = Group::new(&config.id);

            for part_config in &config.parts {
                let index = PartIndex(layout.parts.len());
                if layout.part_ids.insert(part_config.id.clone(), index).is_some() {
                    return Err(AssemblyError::DuplicatePart {
                        id: part_config.id.clone(),
                    });
                }
                let mut part = Part::new(&part_config.id, &config.id, group_index);
                if let Some(pose) = part_config.pose {
                    part = part.with_pose(pose);
                }
                layout.parts.push(part);
                group.add_part(index);
            }

            for socket_config in &config.sockets {
                let index = SocketIndex(layout.sockets.len());
                if layout
                    .socket_ids
                    .insert(socket_config.name.clone(), index)
                    .is_some()
                {
                    return Err(AssemblyError::DuplicateSocket {
                        name: socket_config.name.clone(),
                    });
                }

                let mut socket = Socket::new(&socket_config.name, group_index)
                    .with_exit_debounce(file.assembly.exit_debounce);

                if let Some(slot) = &socket_config.slot {
                    let part_index = *layout.part_ids.get(slot).ok_or_else(|| {
                        AssemblyError::UnknownPart {
                            id: slot.clone(),
                            context: format!("socket '{}'", socket_config.name),
                        }
                    })?;
                    let part = &layout.parts[part_index.0];
                    if part.group() != group_index {
                        return Err(AssemblyError::SlotGroupMismatch {
                            socket: socket_config.name.clone(),
                            part: slot.clone(),
                            part_group: part.group_id().to_string(),
                            socket_group: config.id.clone(),
                        });
                    }
                    socket = socket.with_slot(part_index);
                }
                if let Some(attach) = socket_config.attach {
                    socket = socket.with_attach(attach);
                }
                if let Some(multiplier) = socket_config.scale_multiplier {
                    socket = socket.with_scale_multiplier(multiplier);
                }

                layout.sockets.push(socket);
                group.add_socket(index);
            }

            if group.sockets().len() < group.total() {
                tracing::warn!(
                    group = %config.id,
                    parts = group.total(),
                    sockets = group.sockets().len(),
                    "Group has fewer sockets than parts and cannot complete"
                );
            }
            layout.groups.push(group);
        }

        layout.ordering = layout.resolve_ordering(file.order.as_deref())?;
        Ok(layout)
    }

    fn resolve_ordering(&self, order: Option<&[String]>) -> AssemblyResult<Vec<Unit>> {
        let Some(order) = order else {
            return Ok(match self.mode {
                SequenceMode::Grouped => (0..self.groups.len())
                    .map(|i| Unit::Group(GroupIndex(i)))
                    .collect(),
                SequenceMode::Flat => (0..self.parts.len())
                    .map(|i| Unit::Part(PartIndex(i)))
                    .collect(),
            });
        };

        let mut seen = HashSet::new();
        let mut ordering = Vec::with_capacity(order.len());
        for id in order {
            if !seen.insert(id.as_str()) {
                return Err(AssemblyError::DuplicateOrderEntry { id: id.clone() });
            }
            let unit = match self.mode {
                SequenceMode::Grouped => self
                    .group_ids
                    .get(id)
                    .map(|&g| Unit::Group(g))
                    .ok_or_else(|| AssemblyError::UnknownGroup {
                        id: id.clone(),
                        context: "order".to_string(),
                    })?,
                SequenceMode::Flat => self
                    .part_ids
                    .get(id)
                    .map(|&p| Unit::Part(p))
                    .ok_or_else(|| AssemblyError::UnknownPart {
                        id: id.clone(),
                        context: "order".to_string(),
                    })?,
            };
            ordering.push(unit);
        }

        let expected = match self.mode {
            SequenceMode::Grouped => self.groups.len(),
            SequenceMode::Flat => self.parts.len(),
        };
        if ordering.len() < expected {
            tracing::warn!(
                listed = ordering.len(),
                declared = expected,
                "Order leaves some units out; they will stay locked"
            );
        }

        Ok(ordering)
    }
}

/// Assembles a [`Session`] from a description and its collaborators
pub struct SessionBuilder {
    /// Resolved arenas
    layout: Layout,
    /// Timing model
    timing: TimingModel,
    /// Time source
    clock: Option<Box<dyn Clock>>,
    /// Instruction lookup
    instructions: Box<dyn InstructionSource>,
    /// Instruction display
    display: Box<dyn InstructionDisplay>,
    /// Timing persistence
    sink: Option<Box<dyn TimingSink>>,
}

impl SessionBuilder {
    /// Resolve a description. Instructions and display come from it too.
    pub fn new(file: &AssemblyFile) -> AssemblyResult<Self> {
        Ok(Self {
            layout: Layout::from_file(file)?,
            timing: file.assembly.timing,
            clock: None,
            instructions: Box::new(file.instruction_book()),
            display: Box::new(file.instruction_screen()),
            sink: None,
        })
    }

    /// Use a specific time source
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Override the timing model
    pub fn timing(mut self, model: TimingModel) -> Self {
        self.timing = model;
        self
    }

    /// Use a specific instruction source
    pub fn instructions(mut self, source: impl InstructionSource + 'static) -> Self {
        self.instructions = Box::new(source);
        self
    }

    /// Use a specific display
    pub fn display(mut self, display: impl InstructionDisplay + 'static) -> Self {
        self.display = Box::new(display);
        self
    }

    /// Persist timing entries
    pub fn sink(mut self, sink: impl TimingSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Finish. The session is not started yet.
    pub fn build(self) -> Session {
        let clock = self.clock.unwrap_or_else(|| Box::new(SystemClock::new()));
        Session::new(
            self.layout,
            self.timing,
            clock,
            self.instructions,
            self.display,
            self.sink,
        )
    }
}
