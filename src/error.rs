// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types.
//!
//! Two families live here:
//! - [`AssemblyError`]: construction and configuration failures. These are
//!   the only errors that abort, and they happen before a session starts.
//! - [`Fault`]: runtime rejections. Every runtime operation reports them as
//!   values; the session logs them at their [`Severity`] and carries on.

use std::path::PathBuf;

use thiserror::Error;

use crate::assembly::AssemblyState;

/// Result type for building assemblies.
pub type AssemblyResult<T> = Result<T, AssemblyError>;

/// Errors raised while building an assembly from its description.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// Two groups share an id.
    #[error("Group '{id}' is declared more than once")]
    DuplicateGroup {
        /// The duplicated group id.
        id: String,
    },

    /// Two parts share an id.
    #[error("Part '{id}' is declared more than once")]
    DuplicatePart {
        /// The duplicated part id.
        id: String,
    },

    /// Two sockets share a name.
    #[error("Socket '{name}' is declared more than once")]
    DuplicateSocket {
        /// The duplicated socket name.
        name: String,
    },

    /// A group declares no parts and could never complete.
    #[error("Group '{id}' has no parts")]
    EmptyGroup {
        /// The empty group id.
        id: String,
    },

    /// An ordering or reference names a group that does not exist.
    #[error("Unknown group '{id}' referenced in {context}")]
    UnknownGroup {
        /// The missing group id.
        id: String,
        /// Where the reference was found.
        context: String,
    },

    /// An ordering or socket slot names a part that does not exist.
    #[error("Unknown part '{id}' referenced in {context}")]
    UnknownPart {
        /// The missing part id.
        id: String,
        /// Where the reference was found.
        context: String,
    },

    /// A socket slot names a part from a different group.
    #[error("Socket '{socket}' slot '{part}' belongs to group '{part_group}', not '{socket_group}'")]
    SlotGroupMismatch {
        /// Socket name.
        socket: String,
        /// Slot part id.
        part: String,
        /// Group of the slot part.
        part_group: String,
        /// Group of the socket.
        socket_group: String,
    },

    /// The ordering lists the same unit twice.
    #[error("'{id}' appears more than once in the assembly order")]
    DuplicateOrderEntry {
        /// The repeated id.
        id: String,
    },

    /// Configuration could not be parsed.
    #[error("Failed to parse {format} configuration: {message}")]
    Parse {
        /// Format name (YAML, TOML).
        format: &'static str,
        /// Parser message.
        message: String,
    },

    /// I/O error during file operations.
    #[error("I/O error at '{path}': {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// How loudly a [`Fault`] is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Recoverable rejection or missing data.
    Warning,
    /// Invariant violation in an upstream caller.
    Error,
}

/// Runtime rejection. Never fatal: the state is left untouched or clamped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Fault {
    /// A part was asked to move along an undefined edge of its state machine.
    #[error("Part '{part}' cannot go from {from:?} to {to:?}")]
    InvalidTransition {
        /// Part id.
        part: String,
        /// Current state.
        from: AssemblyState,
        /// Requested state.
        to: AssemblyState,
    },

    /// Assembly was attempted on a part that is not Unlocked.
    #[error("Part '{part}' cannot be assembled while {state:?}")]
    PartNotUnlocked {
        /// Part id.
        part: String,
        /// Current state.
        state: AssemblyState,
    },

    /// A grab was attempted on a part whose affordance is not grabbable.
    #[error("Part '{part}' is not grabbable")]
    NotGrabbable {
        /// Part id.
        part: String,
    },

    /// The socket already holds a part.
    #[error("Socket '{socket}' is already occupied")]
    SocketOccupied {
        /// Socket name.
        socket: String,
    },

    /// The socket is not active yet.
    #[error("Socket '{socket}' is not active")]
    SocketInactive {
        /// Socket name.
        socket: String,
    },

    /// The candidate does not belong to the socket's group or slot.
    #[error("Socket '{socket}' rejects part '{part}'")]
    Mismatch {
        /// Socket name.
        socket: String,
        /// Part id.
        part: String,
    },

    /// An exit event arrived inside the debounce window.
    #[error("Socket '{socket}' ignored an exit {elapsed:.3}s after the previous one")]
    Debounced {
        /// Socket name.
        socket: String,
        /// Time since the last processed exit.
        elapsed: f64,
    },

    /// A group was told to unlock twice.
    #[error("Group '{group}' is already unlocked")]
    AlreadyUnlocked {
        /// Group id.
        group: String,
    },

    /// A group received more assembled notifications than it has parts.
    #[error("Group '{group}' assembled count would exceed {total} parts")]
    CountOverflow {
        /// Group id.
        group: String,
        /// Number of parts in the group.
        total: usize,
    },

    /// A completion notice arrived for a unit that is not the head.
    #[error("Completion reported for {unit}, but the current unit is {head}")]
    NotHead {
        /// Unit that reported completion.
        unit: String,
        /// Current head (or "none").
        head: String,
    },

    /// A timing stop had no matching start.
    #[error("No timing start recorded for '{key}'")]
    MissingTimingStart {
        /// Key that was looked up.
        key: String,
    },

    /// An id used at runtime does not exist.
    #[error("Unknown {kind} '{id}'")]
    Unknown {
        /// "part" or "socket".
        kind: &'static str,
        /// The id.
        id: String,
    },
}

impl Fault {
    /// Severity per the error taxonomy.
    pub fn severity(&self) -> Severity {
        match self {
            Fault::AlreadyUnlocked { .. }
            | Fault::CountOverflow { .. }
            | Fault::NotHead { .. } => Severity::Error,
            _ => Severity::Warning,
        }
    }

    /// Emit this fault through `tracing` at its severity.
    pub fn log(&self) {
        match self.severity() {
            Severity::Error => tracing::error!("{}", self),
            Severity::Warning => tracing::warn!("{}", self),
        }
    }
}
