// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system.
//!
//! This module provides data structures for loading assembly descriptions:
//! groups, parts, sockets, the unlock order, and per-group instructions.
//! Files are YAML or TOML, chosen by extension.

pub mod watcher;

pub use watcher::{validate_config, ConfigEvent, ConfigWatcher};

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::assembly::{Pose, SequenceMode};
use crate::error::{AssemblyError, AssemblyResult};
use crate::instructions::{Instruction, InstructionBook, InstructionScreen};
use crate::recording::DEFAULT_TIMING_LOG;
use crate::timing::{TimingModel, DEFAULT_DEBOUNCE_WINDOW};

/// Root configuration for an assembly exercise
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssemblyFile {
    /// Unlock order: group ids (grouped mode) or part ids (flat mode).
    /// Declaration order when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<String>>,
    /// Session settings
    pub assembly: AssemblyConfig,
    /// Group definitions
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
    /// Per-group instructions
    #[serde(default)]
    pub instructions: Vec<Instruction>,
    /// Text shown when no instruction applies and once everything is assembled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion: Option<CompletionText>,
}

impl AssemblyFile {
    /// Load a configuration, picking the format from the extension
    pub fn load<P: AsRef<Path>>(path: P) -> AssemblyResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| AssemblyError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml(&contents),
            _ => Self::from_yaml(&contents),
        }
    }

    /// Parse from a YAML string
    pub fn from_yaml(yaml: &str) -> AssemblyResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| AssemblyError::Parse {
            format: "YAML",
            message: e.to_string(),
        })
    }

    /// Parse from a TOML string
    pub fn from_toml(text: &str) -> AssemblyResult<Self> {
        toml::from_str(text).map_err(|e| AssemblyError::Parse {
            format: "TOML",
            message: e.to_string(),
        })
    }

    /// Serialize to a YAML string
    pub fn to_yaml(&self) -> AssemblyResult<String> {
        serde_yaml::to_string(self).map_err(|e| AssemblyError::Parse {
            format: "YAML",
            message: e.to_string(),
        })
    }

    /// Instruction lookup built from the configured list
    pub fn instruction_book(&self) -> InstructionBook {
        InstructionBook::from_list(self.instructions.iter().cloned())
    }

    /// Instruction screen with the configured completion text as default
    pub fn instruction_screen(&self) -> InstructionScreen {
        match &self.completion {
            Some(text) => InstructionScreen::with_defaults(&text.title, &text.text),
            None => InstructionScreen::new(),
        }
    }

    /// Where timing records go
    pub fn timing_log_path(&self) -> PathBuf {
        PathBuf::from(
            self.assembly
                .timing_log
                .as_deref()
                .unwrap_or(DEFAULT_TIMING_LOG),
        )
    }

    /// Total number of parts across groups
    pub fn part_count(&self) -> usize {
        self.groups.iter().map(|g| g.parts.len()).sum()
    }
}

/// Session-level settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssemblyConfig {
    /// Exercise name
    #[serde(default = "default_name")]
    pub name: String,
    /// Unit of work granularity
    #[serde(default)]
    pub mode: SequenceMode,
    /// Timing model
    #[serde(default)]
    pub timing: TimingModel,
    /// Minimum seconds between processed socket exits
    #[serde(default = "default_exit_debounce")]
    pub exit_debounce: f64,
    /// Timing log path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing_log: Option<String>,
}

fn default_name() -> String {
    "Assembly".to_string()
}
fn default_exit_debounce() -> f64 {
    DEFAULT_DEBOUNCE_WINDOW
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            mode: SequenceMode::default(),
            timing: TimingModel::default(),
            exit_debounce: default_exit_debounce(),
            timing_log: None,
        }
    }
}

/// Group definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupConfig {
    /// Group id
    pub id: String,
    /// Parts, in order
    #[serde(default)]
    pub parts: Vec<PartConfig>,
    /// Sockets
    #[serde(default)]
    pub sockets: Vec<SocketConfig>,
}

/// Part definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartConfig {
    /// Part id, unique across the assembly
    pub id: String,
    /// Starting pose
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pose: Option<Pose>,
}

/// Socket definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SocketConfig {
    /// Socket name, unique across the assembly
    pub name: String,
    /// Part this socket is paired with, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
    /// Attach pose
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attach: Option<Pose>,
    /// Scale applied to the part on attach
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_multiplier: Option<[f32; 3]>,
}

/// Default display text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionText {
    /// Heading
    pub title: String,
    /// Description
    #[serde(default)]
    pub text: String,
}
