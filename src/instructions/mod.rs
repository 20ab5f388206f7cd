// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Per-group assembly instructions.
//!
//! This module provides:
//! - Instruction lookup by group id
//! - The display collaborator instructions are pushed to

pub mod screen;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub use screen::{InstructionDisplay, InstructionScreen, DEFAULT_DESCRIPTION, DEFAULT_TITLE};

/// Title and description shown while a group is being assembled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// Group the instruction belongs to
    pub group: String,
    /// Heading
    pub title: String,
    /// Step-by-step text
    #[serde(default)]
    pub text: String,
}

impl Instruction {
    /// Create a new instruction
    pub fn new(group: impl Into<String>, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            title: title.into(),
            text: text.into(),
        }
    }
}

/// Pure lookup of instructions by group id
pub trait InstructionSource {
    /// Instruction for a group, if one exists
    fn instruction(&self, group_id: &str) -> Option<&Instruction>;
}

/// Instructions indexed by group id
#[derive(Debug, Clone, Default)]
pub struct InstructionBook {
    /// Instructions by group id
    by_group: HashMap<String, Instruction>,
}

impl InstructionBook {
    /// Create an empty book
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list. Duplicate group ids keep the first entry.
    pub fn from_list(instructions: impl IntoIterator<Item = Instruction>) -> Self {
        let mut book = Self::new();
        for instruction in instructions {
            book.insert(instruction);
        }
        book
    }

    /// Add an instruction. Returns false if the group already had one.
    pub fn insert(&mut self, instruction: Instruction) -> bool {
        if self.by_group.contains_key(&instruction.group) {
            tracing::warn!(
                group = %instruction.group,
                "Duplicate instruction for group, only the first will be used"
            );
            return false;
        }
        tracing::debug!(group = %instruction.group, "Instruction added");
        self.by_group.insert(instruction.group.clone(), instruction);
        true
    }

    /// Number of instructions
    pub fn len(&self) -> usize {
        self.by_group.len()
    }

    /// Whether the book is empty
    pub fn is_empty(&self) -> bool {
        self.by_group.is_empty()
    }
}

impl InstructionSource for InstructionBook {
    fn instruction(&self, group_id: &str) -> Option<&Instruction> {
        let found = self.by_group.get(group_id);
        if found.is_none() {
            tracing::warn!(group = %group_id, "No instruction found for group");
        }
        found
    }
}
