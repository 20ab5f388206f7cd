// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Elapsed-time records per (group, part).

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Fault;

/// How timing windows are opened and closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingModel {
    /// One stamp per group. Each stop records the time since the group's
    /// last stamp, then re-stamps it, so parts get consecutive slices.
    PerGroupInterval,
    /// One stamp per part. A stop records the time since that part's stamp
    /// and removes it.
    PerPartAbsolute,
}

impl Default for TimingModel {
    fn default() -> Self {
        TimingModel::PerGroupInterval
    }
}

/// One completed measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingEntry {
    /// Group id
    pub group_id: String,
    /// Part id
    pub part_id: String,
    /// Seconds taken, never negative
    pub duration: f64,
}

impl TimingEntry {
    /// Create a new entry, clamping negative durations to zero
    pub fn new(group_id: impl Into<String>, part_id: impl Into<String>, duration: f64) -> Self {
        Self {
            group_id: group_id.into(),
            part_id: part_id.into(),
            duration: duration.max(0.0),
        }
    }
}

/// Numeric suffix of a group id without leading zeros ("G012" -> "12").
///
/// An all-zero suffix yields an empty string.
pub fn group_rank(group_id: &str) -> Option<&str> {
    let stem = group_id.trim_end_matches(|c: char| c.is_ascii_digit());
    if stem.len() == group_id.len() {
        return None;
    }
    Some(group_id[stem.len()..].trim_start_matches('0'))
}

/// Report ordering: numeric group suffix first (missing suffix last), then part id.
///
/// Suffixes compare by digit count, then digit by digit, so any length works.
pub fn report_order(a: &TimingEntry, b: &TimingEntry) -> Ordering {
    rank_key(a)
        .cmp(&rank_key(b))
        .then_with(|| a.part_id.cmp(&b.part_id))
}

fn rank_key(entry: &TimingEntry) -> (bool, usize, &str) {
    match group_rank(&entry.group_id) {
        Some(digits) => (false, digits.len(), digits),
        None => (true, 0, ""),
    }
}

/// Accumulates timing entries. Append-only.
#[derive(Debug, Clone, Default)]
pub struct TimingRecorder {
    /// Active model
    model: TimingModel,
    /// Open stamps, keyed by group id or part id depending on the model
    stamps: HashMap<String, f64>,
    /// Entries in arrival order
    entries: Vec<TimingEntry>,
}

impl TimingRecorder {
    /// Create a recorder for a model
    pub fn new(model: TimingModel) -> Self {
        Self {
            model,
            stamps: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// Get active model
    pub fn model(&self) -> TimingModel {
        self.model
    }

    /// Open (or re-open) a timing window for a group or part key
    pub fn start(&mut self, key: &str, now: f64) {
        self.stamps.insert(key.to_string(), now);
        tracing::debug!(key, at = now, "Timing started");
    }

    /// Whether a window is open for a key
    pub fn is_running(&self, key: &str) -> bool {
        self.stamps.contains_key(key)
    }

    /// Close the window for a part and record an entry.
    ///
    /// Without a matching start nothing is recorded.
    pub fn stop(&mut self, group_id: &str, part_id: &str, now: f64) -> Result<TimingEntry, Fault> {
        let key = match self.model {
            TimingModel::PerGroupInterval => group_id,
            TimingModel::PerPartAbsolute => part_id,
        };

        let started = match self.model {
            TimingModel::PerGroupInterval => self.stamps.insert(key.to_string(), now),
            TimingModel::PerPartAbsolute => self.stamps.remove(key),
        };

        let Some(started) = started else {
            // Unknown group: drop the stamp insert() just created
            self.stamps.remove(key);
            return Err(Fault::MissingTimingStart {
                key: key.to_string(),
            });
        };

        let entry = TimingEntry::new(group_id, part_id, now - started);
        tracing::info!(
            group = %group_id,
            part = %part_id,
            seconds = entry.duration,
            "Timing stopped"
        );
        self.entries.push(entry.clone());
        Ok(entry)
    }

    /// Entries in arrival order
    pub fn entries(&self) -> &[TimingEntry] {
        &self.entries
    }

    /// Entries in report order
    pub fn get_all_entries(&self) -> Vec<&TimingEntry> {
        let mut sorted: Vec<&TimingEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| report_order(a, b));
        sorted
    }

    /// Sum of all recorded durations
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.duration).sum()
    }

    /// Snapshot for display
    pub fn report(&self) -> TimingReport {
        TimingReport::new(self.entries.clone())
    }
}

/// Sorted entries plus running total
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimingReport {
    /// Entries in report order
    entries: Vec<TimingEntry>,
    /// Sum of durations
    total: f64,
}

impl TimingReport {
    /// Build a report from entries in any order
    pub fn new(mut entries: Vec<TimingEntry>) -> Self {
        entries.sort_by(report_order);
        let total = entries.iter().map(|e| e.duration).sum();
        Self { entries, total }
    }

    /// Get sorted entries
    pub fn entries(&self) -> &[TimingEntry] {
        &self.entries
    }

    /// Get total seconds
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One display line per entry
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| format!("{} - {}: {:.1}s", e.group_id, e.part_id, e.duration))
            .collect()
    }

    /// Total line
    pub fn total_line(&self) -> String {
        format!("Total time: {:.1}s", self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_rank() {
        assert_eq!(group_rank("G1"), Some("1"));
        assert_eq!(group_rank("Group12"), Some("12"));
        assert_eq!(group_rank("G007"), Some("7"));
        assert_eq!(group_rank("7"), Some("7"));
        assert_eq!(group_rank("G0"), Some(""));
        assert_eq!(group_rank("Cams"), None);
        assert_eq!(group_rank(""), None);
    }

    #[test]
    fn test_report_order_long_suffixes() {
        let long = format!("G{}", "9".repeat(25));
        let longer = format!("G1{}", "0".repeat(25));
        let report = TimingReport::new(vec![
            TimingEntry::new("Cams", "P4", 1.0),
            TimingEntry::new(longer.as_str(), "P3", 1.0),
            TimingEntry::new(long.as_str(), "P2", 1.0),
            TimingEntry::new("G2", "P1", 1.0),
        ]);

        let groups: Vec<&str> = report.entries().iter().map(|e| e.group_id.as_str()).collect();
        assert_eq!(groups, vec!["G2", long.as_str(), longer.as_str(), "Cams"]);
    }

    #[test]
    fn test_group_interval_slices() {
        let mut recorder = TimingRecorder::new(TimingModel::PerGroupInterval);
        recorder.start("G1", 10.0);

        let first = recorder.stop("G1", "P1", 12.5).unwrap();
        assert_eq!(first.duration, 2.5);

        let second = recorder.stop("G1", "P2", 13.0).unwrap();
        assert_eq!(second.duration, 0.5);
        assert_eq!(recorder.total(), 3.0);
    }

    #[test]
    fn test_zero_elapsed_stops_record_zero() {
        let mut recorder = TimingRecorder::new(TimingModel::PerGroupInterval);
        recorder.start("G1", 4.0);

        let a = recorder.stop("G1", "P1", 4.0).unwrap();
        let b = recorder.stop("G1", "P1", 4.0).unwrap();
        assert_eq!(a.duration, 0.0);
        assert_eq!(b.duration, 0.0);
        assert_eq!(recorder.entries().len(), 2);
    }

    #[test]
    fn test_part_absolute() {
        let mut recorder = TimingRecorder::new(TimingModel::PerPartAbsolute);
        recorder.start("P1", 1.0);
        recorder.start("P2", 2.0);

        assert_eq!(recorder.stop("G1", "P2", 5.0).unwrap().duration, 3.0);
        assert_eq!(recorder.stop("G1", "P1", 6.0).unwrap().duration, 5.0);

        // Stamp was consumed
        assert!(!recorder.is_running("P1"));
        assert!(recorder.stop("G1", "P1", 7.0).is_err());
        assert_eq!(recorder.entries().len(), 2);
    }

    #[test]
    fn test_stop_without_start() {
        let mut recorder = TimingRecorder::default();
        let result = recorder.stop("G1", "P1", 1.0);
        assert_eq!(
            result,
            Err(Fault::MissingTimingStart {
                key: "G1".to_string()
            })
        );
        assert!(recorder.entries().is_empty());
        assert!(!recorder.is_running("G1"));
    }

    #[test]
    fn test_clock_step_back_clamped() {
        let mut recorder = TimingRecorder::default();
        recorder.start("G1", 5.0);
        assert_eq!(recorder.stop("G1", "P1", 4.0).unwrap().duration, 0.0);
    }

    #[test]
    fn test_report_order() {
        let mut recorder = TimingRecorder::default();
        for (group, part, at) in [
            ("G10", "B", 1.0),
            ("Extras", "A", 2.0),
            ("G2", "Z", 3.0),
            ("G2", "A", 4.0),
        ] {
            recorder.start(group, 0.0);
            recorder.stop(group, part, at).unwrap();
        }

        let order: Vec<(&str, &str)> = recorder
            .get_all_entries()
            .iter()
            .map(|e| (e.group_id.as_str(), e.part_id.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![("G2", "A"), ("G2", "Z"), ("G10", "B"), ("Extras", "A")]
        );

        // Arrival order is untouched
        assert_eq!(recorder.entries()[0].group_id, "G10");
    }

    #[test]
    fn test_report_lines() {
        let report = TimingReport::new(vec![
            TimingEntry::new("G2", "P3", 1.24),
            TimingEntry::new("G1", "P1", 2.0),
        ]);
        assert_eq!(report.lines(), vec!["G1 - P1: 2.0s", "G2 - P3: 1.2s"]);
        assert_eq!(report.total_line(), "Total time: 3.2s");
    }
}
