// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Timing persistence.
//!
//! This module provides:
//! - The [`TimingSink`] trait completed entries are pushed to
//! - A semicolon-delimited, append-only log file
//! - Reading a log back for reports

pub mod csv_log;

use std::io;

pub use csv_log::{read_timing_log, CsvTimingLog, DEFAULT_TIMING_LOG, HEADER};

use crate::timing::TimingEntry;

/// Destination for completed timing entries, in arrival order
pub trait TimingSink {
    /// Persist one entry
    fn append(&mut self, entry: &TimingEntry) -> io::Result<()>;
}

impl TimingSink for Vec<TimingEntry> {
    fn append(&mut self, entry: &TimingEntry) -> io::Result<()> {
        self.push(entry.clone());
        Ok(())
    }
}
