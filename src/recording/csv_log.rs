// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Semicolon-delimited timing log.
//!
//! One header line `GroupId;PartId;TimeTaken`, then one record per line
//! with the time in decimal seconds. The file is only ever appended to.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use super::TimingSink;
use crate::timing::TimingEntry;

/// Header line of every log
pub const HEADER: &str = "GroupId;PartId;TimeTaken";

/// Default log location, relative to the working directory
pub const DEFAULT_TIMING_LOG: &str = "TimeData/AssemblyTimes.csv";

/// Append-only timing log file
#[derive(Debug)]
pub struct CsvTimingLog {
    /// Log path
    path: PathBuf,
    /// Open handle in append mode
    file: File,
}

impl CsvTimingLog {
    /// Open a log, creating it (and its directory) with a header if absent
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let needs_header = match fs::metadata(&path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == io::ErrorKind::NotFound => true,
            Err(e) => return Err(e),
        };

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        if needs_header {
            writeln!(file, "{}", HEADER)?;
            tracing::info!(path = %path.display(), "Timing log created");
        }

        Ok(Self { path, file })
    }

    /// Get log path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TimingSink for CsvTimingLog {
    fn append(&mut self, entry: &TimingEntry) -> io::Result<()> {
        write_record(&mut self.file, entry)?;
        self.file.flush()
    }
}

/// Write one record line
pub fn write_record<W: Write>(writer: &mut W, entry: &TimingEntry) -> io::Result<()> {
    writeln!(writer, "{};{};{}", entry.group_id, entry.part_id, entry.duration)
}

/// Parse one record line
pub fn parse_record(line: &str) -> Option<TimingEntry> {
    let mut fields = line.trim_end_matches(['\r', '\n']).split(';');
    let group_id = fields.next()?;
    let part_id = fields.next()?;
    let seconds: f64 = fields.next()?.trim().parse().ok()?;
    if fields.next().is_some() || !seconds.is_finite() {
        return None;
    }
    Some(TimingEntry::new(group_id, part_id, seconds))
}

/// Read every record of a log, skipping the header and malformed lines
pub fn read_timing_log<P: AsRef<Path>>(path: P) -> io::Result<Vec<TimingEntry>> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let mut entries = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() || line.trim() == HEADER {
            continue;
        }
        match parse_record(&line) {
            Some(entry) => entries.push(entry),
            None => tracing::warn!(
                path = %path.as_ref().display(),
                line = number + 1,
                "Skipping malformed timing record"
            ),
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_creates_header_only_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("TimeData").join("AssemblyTimes.csv");

        let log = CsvTimingLog::open(&path).unwrap();
        assert_eq!(log.path(), path.as_path());
        assert_eq!(fs::read_to_string(&path).unwrap(), "GroupId;PartId;TimeTaken\n");
    }

    #[test]
    fn test_appends_in_arrival_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("times.csv");

        let mut log = CsvTimingLog::open(&path).unwrap();
        log.append(&TimingEntry::new("G2", "P3", 1.5)).unwrap();
        log.append(&TimingEntry::new("G1", "P1", 0.0)).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "GroupId;PartId;TimeTaken\nG2;P3;1.5\nG1;P1;0\n");
    }

    #[test]
    fn test_reopen_does_not_repeat_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("times.csv");

        {
            let mut log = CsvTimingLog::open(&path).unwrap();
            log.append(&TimingEntry::new("G1", "P1", 2.0)).unwrap();
        }
        let mut log = CsvTimingLog::open(&path).unwrap();
        log.append(&TimingEntry::new("G1", "P2", 3.0)).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.matches(HEADER).count(), 1);

        let entries = read_timing_log(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1], TimingEntry::new("G1", "P2", 3.0));
    }

    #[test]
    fn test_parse_record() {
        assert_eq!(
            parse_record("G1;P1;2.25"),
            Some(TimingEntry::new("G1", "P1", 2.25))
        );
        assert_eq!(parse_record("G1;P1"), None);
        assert_eq!(parse_record("G1;P1;abc"), None);
        assert_eq!(parse_record("G1;P1;1;extra"), None);
    }

    #[test]
    fn test_read_skips_malformed_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("times.csv");
        fs::write(&path, "GroupId;PartId;TimeTaken\nG1;P1;1\ngarbage\n\nG2;P2;4.5\n").unwrap();

        let entries = read_timing_log(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].duration, 4.5);
    }
}
