// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Unlock queue.
//!
//! The sequencer is the single source of truth for what may be touched
//! right now. It never reaches into groups or parts: each call returns a
//! [`Step`] the owner applies.

use std::collections::VecDeque;

use crate::assembly::Unit;
use crate::error::Fault;

/// Follow-up the owner of a sequencer performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Make this unit interactive
    Unlock(Unit),
    /// Every unit is done; run the completion side effect once
    Finished,
    /// Nothing to do
    Idle,
}

/// Lifecycle of the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    /// No ordering loaded yet
    Uninitialized,
    /// A head unit is interactive
    Running,
    /// Terminal: every unit completed
    Finished,
}

/// FIFO of work units with one interactive head
#[derive(Debug, Clone)]
pub struct Sequencer {
    /// Units not yet unlocked
    queue: VecDeque<Unit>,
    /// Unit currently interactive
    head: Option<Unit>,
    /// Lifecycle
    state: SequencerState,
    /// Units completed so far
    completed: usize,
    /// Units in the ordering
    total: usize,
}

impl Sequencer {
    /// Create an empty sequencer
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            head: None,
            state: SequencerState::Uninitialized,
            completed: 0,
            total: 0,
        }
    }

    /// Get lifecycle state
    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Unit currently interactive
    pub fn head(&self) -> Option<Unit> {
        self.head
    }

    /// Units still waiting
    pub fn pending(&self) -> impl Iterator<Item = &Unit> {
        self.queue.iter()
    }

    /// Units completed so far
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Units in the ordering
    pub fn total(&self) -> usize {
        self.total
    }

    /// Whether the terminal state was reached
    pub fn is_finished(&self) -> bool {
        self.state == SequencerState::Finished
    }

    /// Load the ordering and unlock its first unit.
    ///
    /// An empty ordering, or a second call, is a no-op with a warning.
    pub fn initialize(&mut self, ordering: impl IntoIterator<Item = Unit>) -> Step {
        if self.state != SequencerState::Uninitialized {
            tracing::warn!("Sequencer already initialized, ignoring new ordering");
            return Step::Idle;
        }

        let queue: VecDeque<Unit> = ordering.into_iter().collect();
        if queue.is_empty() {
            tracing::warn!("Empty assembly ordering, nothing to unlock");
            return Step::Idle;
        }

        for unit in &queue {
            tracing::debug!(%unit, "Unit added to the queue");
        }
        self.total = queue.len();
        self.queue = queue;
        self.state = SequencerState::Running;
        self.advance()
    }

    /// Move to the next unit.
    ///
    /// Call once per completed unit. Past the last unit this enters the
    /// terminal state; after that it does nothing.
    pub fn advance(&mut self) -> Step {
        match self.state {
            SequencerState::Uninitialized => {
                tracing::warn!("Advance requested before initialization");
                Step::Idle
            }
            SequencerState::Finished => {
                tracing::debug!("Sequencer already finished");
                Step::Idle
            }
            SequencerState::Running => match self.queue.pop_front() {
                Some(unit) => {
                    tracing::info!(%unit, "Unlocking next unit");
                    self.head = Some(unit);
                    Step::Unlock(unit)
                }
                None => {
                    tracing::info!("All units have been assembled");
                    self.head = None;
                    self.state = SequencerState::Finished;
                    Step::Finished
                }
            },
        }
    }

    /// Accept a completion notice for the head and advance.
    ///
    /// A notice for anything but the head is an upstream logic fault; it is
    /// reported and the queue is left untouched.
    pub fn on_unit_completed(&mut self, unit: Unit) -> Result<Step, Fault> {
        if self.head != Some(unit) {
            return Err(Fault::NotHead {
                unit: unit.to_string(),
                head: self
                    .head
                    .map_or_else(|| "none".to_string(), |head| head.to_string()),
            });
        }

        tracing::info!(%unit, "Unit completed");
        self.completed += 1;
        Ok(self.advance())
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}
