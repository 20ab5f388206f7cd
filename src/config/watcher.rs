// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! File watcher for instruction hot-reload.
//!
//! Edits to the assembly description are picked up while a session runs.
//! A reloaded description is fully validated before it is handed out, and
//! only its instructions are applied; the arenas of a running session
//! never change.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use super::AssemblyFile;
use crate::sequencer::Layout;

/// Default quiet period before a modified file is reloaded
const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Events emitted by the config watcher
#[derive(Debug, Clone)]
pub enum ConfigEvent {
    /// Description was modified and passed validation
    Reloaded(Box<AssemblyFile>),
    /// Description was modified but failed to parse or validate
    Error(String),
}

/// Description file watcher with debouncing and validation
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    event_receiver: Receiver<ConfigEvent>,
    watched_path: PathBuf,
}

impl ConfigWatcher {
    /// Watch a description file (or a directory of them).
    ///
    /// Modifications are coalesced for `debounce_ms` (500 by default)
    /// before the file is reloaded.
    pub fn new<P: AsRef<Path>>(path: P, debounce_ms: Option<u64>) -> Result<Self> {
        let watched_path = path.as_ref().to_path_buf();
        let debounce = Duration::from_millis(debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS));

        let (event_tx, event_rx): (Sender<ConfigEvent>, Receiver<ConfigEvent>) = mpsc::channel();
        let (notify_tx, notify_rx): (Sender<Event>, Receiver<Event>) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    let _ = notify_tx.send(event);
                }
            },
            Config::default(),
        )
        .map_err(|e| anyhow!("Failed to create file watcher: {}", e))?;

        let mode = if watched_path.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher
            .watch(&watched_path, mode)
            .map_err(|e| anyhow!("Failed to watch path {:?}: {}", watched_path, e))?;

        let target = watched_path.clone();
        std::thread::spawn(move || {
            let mut last_event: Option<Instant> = None;
            let mut pending: Vec<PathBuf> = Vec::new();

            loop {
                match notify_rx.recv_timeout(Duration::from_millis(100)) {
                    Ok(event) => {
                        if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                            for path in event.paths {
                                if is_description(&path, &target) && !pending.contains(&path) {
                                    pending.push(path);
                                }
                            }
                            last_event = Some(Instant::now());
                        }
                    }
                    Err(mpsc::RecvTimeoutError::Timeout) => {
                        let settled = last_event.is_some_and(|t| t.elapsed() >= debounce);
                        if settled {
                            for path in pending.drain(..) {
                                if event_tx.send(reload(&path)).is_err() {
                                    return;
                                }
                            }
                            last_event = None;
                        }
                    }
                    Err(mpsc::RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        tracing::info!(path = %watched_path.display(), "Watching assembly description");
        Ok(Self {
            _watcher: watcher,
            event_receiver: event_rx,
            watched_path,
        })
    }

    /// Try to receive the next config event (non-blocking)
    pub fn try_recv(&self) -> Option<ConfigEvent> {
        self.event_receiver.try_recv().ok()
    }

    /// Receive all pending config events
    pub fn recv_all(&self) -> Vec<ConfigEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }

    /// Get the path being watched
    pub fn watched_path(&self) -> &Path {
        &self.watched_path
    }
}

fn is_description(path: &Path, target: &Path) -> bool {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml" | "yml" | "toml") => true,
        _ => path == target,
    }
}

fn reload(path: &Path) -> ConfigEvent {
    match validate_config(path) {
        Ok(file) => {
            tracing::info!(path = %path.display(), "Assembly description reloaded");
            ConfigEvent::Reloaded(Box::new(file))
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "Reload rejected: {:#}", e);
            ConfigEvent::Error(format!("Failed to load {:?}: {:#}", path, e))
        }
    }
}

/// Load a description and check every reference without starting a session
pub fn validate_config<P: AsRef<Path>>(path: P) -> Result<AssemblyFile> {
    let path = path.as_ref();
    let file = AssemblyFile::load(path)?;
    Layout::from_file(&file).with_context(|| format!("Invalid assembly in {:?}", path))?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::tempdir;

    const VALID: &str = r#"
assembly:
  name: "Watch Test"
groups:
  - id: G1
    parts: [{ id: P1 }]
    sockets: [{ name: S1 }]
instructions:
  - { group: G1, title: "First", text: "Initial" }
"#;

    #[test]
    fn test_validate_config() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("engine.yaml");
        fs::write(&file_path, VALID).unwrap();

        let config = validate_config(&file_path).unwrap();
        assert_eq!(config.assembly.name, "Watch Test");
        assert_eq!(config.instructions.len(), 1);
    }

    #[test]
    fn test_validate_invalid_syntax() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("invalid.yaml");
        fs::write(&file_path, "this is not valid yaml: [").unwrap();

        assert!(validate_config(&file_path).is_err());
    }

    #[test]
    fn test_validate_bad_reference() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("typo.yaml");
        fs::write(&file_path, format!("order: [G1, Gx]\n{}", VALID)).unwrap();

        let err = validate_config(&file_path).unwrap_err();
        assert!(format!("{:#}", err).contains("Unknown group 'Gx'"));
    }

    #[test]
    fn test_is_description() {
        let target = Path::new("/tmp/assembly");
        assert!(is_description(Path::new("/tmp/a.yaml"), target));
        assert!(is_description(Path::new("/tmp/a.toml"), target));
        assert!(is_description(target, target));
        assert!(!is_description(Path::new("/tmp/a.csv"), target));
    }

    #[test]
    fn test_watcher_creation() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("engine.yaml"), VALID).unwrap();

        let watcher = ConfigWatcher::new(dir.path(), Some(100)).unwrap();
        assert_eq!(watcher.watched_path(), dir.path());
    }

    #[test]
    fn test_watcher_detects_changes() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("detect.yaml");
        fs::write(&file_path, VALID).unwrap();

        let watcher = ConfigWatcher::new(dir.path(), Some(100)).unwrap();
        std::thread::sleep(Duration::from_millis(50));

        let mut file = fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&file_path)
            .unwrap();
        file.write_all(VALID.replace("Initial", "Modified").as_bytes())
            .unwrap();
        file.flush().unwrap();
        drop(file);

        std::thread::sleep(Duration::from_millis(300));

        // File events are not guaranteed to arrive in time on every platform
        let events = watcher.recv_all();
        if let Some(ConfigEvent::Reloaded(config)) = events
            .iter()
            .find(|e| matches!(e, ConfigEvent::Reloaded(_)))
        {
            assert_eq!(config.instructions[0].text, "Modified");
        }
    }
}
