// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scripted interaction replay.
//!
//! A script is a list of timestamped events addressed by part id and
//! socket name. Replaying one drives a session through a [`ManualClock`],
//! so timing output is reproducible.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AssemblyError, AssemblyResult, Fault};
use crate::timing::ManualClock;

use super::session::{Interaction, Session};

/// Kind of scripted event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Pick up a part
    GrabBegin,
    /// Let go of a part
    GrabRelease,
    /// Part enters a socket volume
    EnterSocket,
    /// Part leaves a socket volume
    ExitSocket,
    /// Drop a part straight into a socket
    Insert,
}

impl EventKind {
    /// Whether the event addresses a socket
    pub fn needs_socket(&self) -> bool {
        matches!(
            self,
            EventKind::EnterSocket | EventKind::ExitSocket | EventKind::Insert
        )
    }
}

/// One scripted event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Session time in seconds
    pub at: f64,
    /// What happens
    pub event: EventKind,
    /// Part id
    pub part: String,
    /// Socket name, for socket events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket: Option<String>,
}

impl ScriptStep {
    /// Create a step without a socket
    pub fn new(at: f64, event: EventKind, part: impl Into<String>) -> Self {
        Self {
            at,
            event,
            part: part.into(),
            socket: None,
        }
    }

    /// Builder: address a socket
    pub fn with_socket(mut self, socket: impl Into<String>) -> Self {
        self.socket = Some(socket.into());
        self
    }
}

/// Ordered list of scripted events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    /// Events in order
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
}

impl ReplayScript {
    /// Create a script from steps
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self { steps }
    }

    /// Load a YAML script
    pub fn load<P: AsRef<Path>>(path: P) -> AssemblyResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| AssemblyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents)
    }

    /// Parse from a YAML string
    pub fn from_yaml(yaml: &str) -> AssemblyResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| AssemblyError::Parse {
            format: "YAML",
            message: e.to_string(),
        })
    }

    /// Drive a session through every step.
    ///
    /// The clock is set to each step's time before the event is delivered.
    /// Unknown ids produce an ignored interaction and replay continues.
    pub fn run(&self, session: &mut Session, clock: &ManualClock) -> Vec<Interaction> {
        let mut outcomes = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            clock.set(step.at);
            let outcome = Self::deliver(step, session);
            tracing::debug!(at = step.at, event = ?step.event, part = %step.part, ?outcome, "Replayed step");
            outcomes.push(outcome);
        }

        outcomes
    }

    fn deliver(step: &ScriptStep, session: &mut Session) -> Interaction {
        let Some(part) = session.part_index(&step.part) else {
            return unknown("part", &step.part);
        };

        if !step.event.needs_socket() {
            return match step.event {
                EventKind::GrabBegin => session.grab_begin(part),
                _ => session.grab_release(part),
            };
        }

        let name = step.socket.as_deref().unwrap_or_default();
        let Some(socket) = session.socket_index(name) else {
            return unknown("socket", name);
        };

        match step.event {
            EventKind::EnterSocket => session.enter_socket(socket, part),
            EventKind::ExitSocket => session.exit_socket(socket, part),
            _ => session.insert(socket, part),
        }
    }
}

fn unknown(kind: &'static str, id: &str) -> Interaction {
    let fault = Fault::Unknown {
        kind,
        id: id.to_string(),
    };
    fault.log();
    Interaction::Ignored(fault)
}
