// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Integration tests for assembly-seq
//!
//! These tests drive whole sessions through the public API with a manual
//! clock, so every duration is exact.

use std::fs;

use tempfile::tempdir;

use assembly_seq::assembly::{
    AssemblyState, GroupIndex, Part, PartIndex, Socket, SocketIndex, SocketInteractor, Unit,
};
use assembly_seq::config::AssemblyFile;
use assembly_seq::instructions::{Instruction, InstructionBook, InstructionDisplay};
use assembly_seq::recording::{read_timing_log, CsvTimingLog, HEADER};
use assembly_seq::sequencer::{Interaction, ReplayScript, Session, SessionBuilder};
use assembly_seq::timing::{ManualClock, TimingEntry, TimingModel, TimingRecorder};
use assembly_seq::Fault;

const ENGINE: &str = r#"
assembly:
  name: Engine
groups:
  - id: G1
    parts: [{ id: Crankshaft }, { id: Bearing }]
    sockets:
      - { name: CrankSocket, slot: Crankshaft, attach: { position: [0.0, 0.5, 0.0] } }
      - { name: BearingSocket, slot: Bearing }
  - id: G2
    parts: [{ id: Head }]
    sockets:
      - name: HeadSocket
        attach: { position: [0.0, 1.0, 0.0] }
        scale_multiplier: [1.0, 2.0, 1.0]
instructions:
  - { group: G1, title: "Bottom end", text: "Crank and bearing" }
  - { group: G2, title: "Top end", text: "Fit the head" }
completion:
  title: "Done"
  text: "Engine assembled"
"#;

fn start(yaml: &str, clock: &ManualClock) -> Session {
    let file = AssemblyFile::from_yaml(yaml).unwrap();
    let mut session = SessionBuilder::new(&file)
        .unwrap()
        .clock(clock.clone())
        .build();
    session.start();
    session
}

fn ids(session: &Session) -> (Vec<PartIndex>, Vec<SocketIndex>) {
    let parts = ["Crankshaft", "Bearing", "Head"]
        .iter()
        .map(|id| session.part_index(id).unwrap())
        .collect();
    let sockets = ["CrankSocket", "BearingSocket", "HeadSocket"]
        .iter()
        .map(|name| session.socket_index(name).unwrap())
        .collect();
    (parts, sockets)
}

/// Two groups; both G1 parts unlock G2 exactly once, and G2's part finishes
#[test]
fn test_group_completion_unlocks_next_once() {
    let clock = ManualClock::new(0.0);
    let mut session = start(ENGINE, &clock);
    let (parts, sockets) = ids(&session);

    assert_eq!(session.unlock_count(), 1);
    assert_eq!(session.display().current(), ("Bottom end", "Crank and bearing"));
    assert_eq!(session.parts()[parts[2].0].state(), AssemblyState::Locked);

    clock.set(2.0);
    session.insert(sockets[0], parts[0]);
    assert_eq!(session.unlock_count(), 1);

    clock.set(3.0);
    let result = session.insert(sockets[1], parts[1]);
    assert_eq!(
        result,
        Interaction::Assembled {
            part: parts[1],
            socket: sockets[1],
            group_completed: true,
            finished: false,
        }
    );
    assert_eq!(session.unlock_count(), 2);
    assert_eq!(session.active_unit(), Some(Unit::Group(GroupIndex(1))));
    assert_eq!(session.display().current(), ("Top end", "Fit the head"));

    clock.set(7.5);
    let result = session.insert(sockets[2], parts[2]);
    assert!(matches!(result, Interaction::Assembled { finished: true, .. }));
    assert!(session.is_finished());
    assert_eq!(session.unlock_count(), 2);
    assert_eq!(session.display().current(), ("Done", "Engine assembled"));

    let report = session.report();
    assert_eq!(
        report.lines(),
        vec![
            "G1 - Bearing: 1.0s".to_string(),
            "G1 - Crankshaft: 2.0s".to_string(),
            "G2 - Head: 4.5s".to_string(),
        ]
    );
    assert_eq!(report.total_line(), "Total time: 7.5s");
}

/// A G1 part presented to a G2 socket is rejected and stays Unlocked
#[test]
fn test_cross_group_rejection() {
    let clock = ManualClock::new(0.0);
    let mut session = start(ENGINE, &clock);
    let (parts, sockets) = ids(&session);

    assert!(session.sockets_accepting(parts[0]).iter().all(|&s| s != sockets[2]));

    session.grab_begin(parts[0]);
    assert!(matches!(
        session.enter_socket(sockets[2], parts[0]),
        Interaction::Ignored(Fault::Mismatch { .. })
    ));
    assert_eq!(session.sockets()[sockets[2].0].hover(), None);
    assert_eq!(
        session.grab_release(parts[0]),
        Interaction::Released { part: parts[0] }
    );

    let result = session.insert(sockets[2], parts[0]);
    assert!(matches!(
        result,
        Interaction::Rejected {
            fault: Fault::Mismatch { .. },
            ..
        }
    ));
    assert_eq!(session.parts()[parts[0].0].state(), AssemblyState::Unlocked);
    assert!(!session.sockets()[sockets[2].0].is_occupied());
    assert_eq!(session.sockets()[sockets[2].0].hover(), None);
}

const CROSSED: &str = r#"
assembly: { name: Crossed }
groups:
  - id: G1
    parts: [{ id: P1 }, { id: P2 }]
    sockets: [{ name: S1, slot: P2 }, { name: S2, slot: P1 }]
"#;

/// A part dragged across a socket meant for its neighbour lands in its own
#[test]
fn test_release_lands_in_accepting_socket() {
    let clock = ManualClock::new(0.0);
    let mut session = start(CROSSED, &clock);
    let p1 = session.part_index("P1").unwrap();
    let s1 = session.socket_index("S1").unwrap();
    let s2 = session.socket_index("S2").unwrap();

    session.grab_begin(p1);
    session.enter_socket(s1, p1);
    session.exit_socket(s1, p1);
    clock.set(0.1);
    session.enter_socket(s1, p1);
    clock.set(0.2);
    session.exit_socket(s1, p1);
    clock.set(0.3);
    assert_eq!(
        session.enter_socket(s2, p1),
        Interaction::Hovering {
            part: p1,
            socket: s2
        }
    );
    assert_eq!(session.sockets()[s1.0].hover(), None);

    let result = session.grab_release(p1);
    assert!(result.is_assembled());
    assert_eq!(session.sockets()[s2.0].occupant(), Some(p1));
    assert!(!session.sockets()[s1.0].is_occupied());
}

/// A hovered socket filled by another part no longer catches the release
#[test]
fn test_release_after_hovered_socket_filled() {
    let clock = ManualClock::new(0.0);
    let mut session = start(
        "assembly: { name: Pair }\ngroups:\n  - id: G1\n    parts: [{ id: P1 }, { id: P2 }]\n    sockets: [{ name: A }, { name: B }]\n",
        &clock,
    );
    let p1 = session.part_index("P1").unwrap();
    let p2 = session.part_index("P2").unwrap();
    let a = session.socket_index("A").unwrap();
    let b = session.socket_index("B").unwrap();

    session.grab_begin(p1);
    session.enter_socket(a, p1);
    session.enter_socket(b, p1);
    assert!(session.insert(a, p2).is_assembled());
    assert_eq!(session.sockets()[a.0].hover(), None);

    let result = session.grab_release(p1);
    assert!(matches!(result, Interaction::Assembled { socket, .. } if socket == b));
    assert!(session.is_finished());
}

/// Two stops in the same instant both yield zero durations
#[test]
fn test_zero_elapsed_stops() {
    let mut recorder = TimingRecorder::new(TimingModel::PerGroupInterval);
    recorder.start("G1", 4.0);

    let first = recorder.stop("G1", "P1", 4.0).unwrap();
    let second = recorder.stop("G1", "P1", 4.0).unwrap();

    assert_eq!(first.duration, 0.0);
    assert_eq!(second.duration, 0.0);
    assert_eq!(recorder.entries().len(), 2);
}

/// Stop without start produces no entry
#[test]
fn test_stop_without_start() {
    let mut recorder = TimingRecorder::new(TimingModel::PerGroupInterval);
    let result = recorder.stop("G9", "P1", 1.0);

    assert!(matches!(result, Err(Fault::MissingTimingStart { .. })));
    assert!(recorder.entries().is_empty());
}

/// Exits at 0.1 and 0.3 inside a 0.5 window: only the first is processed
#[test]
fn test_exit_debounce_window() {
    let clock = ManualClock::new(0.0);
    let mut session = start(ENGINE, &clock);
    let (parts, sockets) = ids(&session);

    session.enter_socket(sockets[0], parts[0]);

    clock.set(0.1);
    assert!(matches!(
        session.exit_socket(sockets[0], parts[0]),
        Interaction::Exited { .. }
    ));

    session.enter_socket(sockets[0], parts[0]);
    clock.set(0.3);
    assert!(matches!(
        session.exit_socket(sockets[0], parts[0]),
        Interaction::Ignored(Fault::Debounced { .. })
    ));
    assert_eq!(session.sockets()[sockets[0].0].hover(), Some(parts[0]));

    clock.set(0.7);
    assert!(matches!(
        session.exit_socket(sockets[0], parts[0]),
        Interaction::Exited { .. }
    ));
}

fn chain(groups: usize) -> String {
    let mut yaml = String::from("assembly: { name: Chain }\ngroups:\n");
    for g in 0..groups {
        let parts = 1 + g % 2;
        yaml.push_str(&format!("  - id: G{}\n    parts:\n", g + 1));
        for p in 0..parts {
            yaml.push_str(&format!("      - {{ id: P{}_{} }}\n", g + 1, p + 1));
        }
        yaml.push_str("    sockets:\n");
        for p in 0..parts {
            yaml.push_str(&format!("      - {{ name: S{}_{} }}\n", g + 1, p + 1));
        }
    }
    yaml
}

/// Exactly one unit is interactive until the nth completion finishes
#[test]
fn test_single_interactive_unit_for_any_length() {
    for n in 1..=6 {
        let clock = ManualClock::new(0.0);
        let mut session = start(&chain(n), &clock);

        for g in 0..n {
            let head = session.head_group().unwrap();
            assert_eq!(head, GroupIndex(g));
            assert!(!session.is_finished());

            let interactive = session.interactive_parts();
            assert!(!interactive.is_empty());
            assert!(interactive
                .iter()
                .all(|&p| session.parts()[p.0].group() == head));

            let sockets = session.groups()[g].sockets().to_vec();
            for (part, socket) in interactive.into_iter().zip(sockets) {
                clock.advance(1.0);
                assert!(session.insert(socket, part).is_assembled());
            }
        }

        assert!(session.is_finished());
        assert_eq!(session.sequencer().completed(), n);
        assert!(session.interactive_parts().is_empty());
        assert_eq!(session.unlock_count(), n);
    }
}

/// Committing to a socket succeeds once, whatever follows
#[test]
fn test_socket_commit_at_most_once() {
    let mut parts: Vec<Part> = (0..3)
        .map(|i| Part::new(format!("P{}", i), "G1", GroupIndex(0)))
        .collect();
    for part in &mut parts {
        part.set_state(AssemblyState::Unlocked).unwrap();
    }
    let mut socket = Socket::new("S1", GroupIndex(0));
    socket.activate();

    let mut successes = 0;
    for _ in 0..3 {
        for (i, part) in parts.iter_mut().enumerate() {
            if socket.commit(PartIndex(i), part).is_ok() {
                successes += 1;
            }
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(socket.occupant(), Some(PartIndex(0)));
    assert_eq!(parts[1].state(), AssemblyState::Unlocked);
}

/// Sockets never accept parts from another group, in any socket state
#[test]
fn test_accepts_false_across_groups() {
    let mut foreign = Part::new("P2", "G2", GroupIndex(1));
    foreign.set_state(AssemblyState::Unlocked).unwrap();

    let mut own = Part::new("P1", "G1", GroupIndex(0));
    own.set_state(AssemblyState::Unlocked).unwrap();

    let inactive = Socket::new("S1", GroupIndex(0));
    let mut active = Socket::new("S2", GroupIndex(0));
    active.activate();
    let mut occupied = Socket::new("S3", GroupIndex(0));
    occupied.activate();
    occupied.commit(PartIndex(0), &mut own).unwrap();

    for socket in [&inactive, &active, &occupied] {
        assert!(!socket.accepts(PartIndex(1), &foreign));
    }
}

/// Extra completions after a group completes never advance twice
#[test]
fn test_group_overflow_does_not_advance() {
    let clock = ManualClock::new(0.0);
    let mut session = start(ENGINE, &clock);
    let (parts, sockets) = ids(&session);

    session.insert(sockets[0], parts[0]);
    session.insert(sockets[1], parts[1]);
    assert_eq!(session.unlock_count(), 2);

    // Already assembled: the socket is occupied and the part is Fixed
    let again = session.insert(sockets[1], parts[1]);
    assert!(again.fault().is_some());
    assert_eq!(session.groups()[0].assembled_count(), 2);
    assert_eq!(session.unlock_count(), 2);
}

#[test]
fn test_flat_mode_unlocks_parts_in_order() {
    let yaml = r#"
order: [Bearing, Crankshaft, Head]
assembly:
  name: Flat
  mode: flat
groups:
  - id: G1
    parts: [{ id: Crankshaft }, { id: Bearing }]
    sockets: [{ name: CrankSocket, slot: Crankshaft }, { name: BearingSocket, slot: Bearing }]
  - id: G2
    parts: [{ id: Head }]
    sockets: [{ name: HeadSocket }]
"#;
    let clock = ManualClock::new(0.0);
    let mut session = start(yaml, &clock);
    let (parts, sockets) = ids(&session);

    assert_eq!(session.interactive_parts(), vec![parts[1]]);
    assert!(!session.sockets()[sockets[0].0].is_active());
    assert!(session.sockets()[sockets[1].0].is_active());

    let early = session.insert(sockets[0], parts[0]);
    assert!(early.fault().is_some());

    clock.set(1.0);
    let result = session.insert(sockets[1], parts[1]);
    assert!(matches!(
        result,
        Interaction::Assembled {
            group_completed: false,
            ..
        }
    ));
    assert_eq!(session.interactive_parts(), vec![parts[0]]);

    clock.set(3.0);
    session.insert(sockets[0], parts[0]);
    clock.set(6.0);
    assert!(matches!(
        session.insert(sockets[2], parts[2]),
        Interaction::Assembled { finished: true, .. }
    ));

    // Group interval: G2 opened at t=3 when its first part unlocked
    let durations: Vec<f64> = session.recorder().entries().iter().map(|e| e.duration).collect();
    assert_eq!(durations, vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_per_part_absolute_timing() {
    let clock = ManualClock::new(10.0);
    let yaml = ENGINE.replace("name: Engine", "name: Engine\n  timing: per_part_absolute");
    let file = AssemblyFile::from_yaml(&yaml).unwrap();
    let mut session = SessionBuilder::new(&file)
        .unwrap()
        .clock(clock.clone())
        .build();
    session.start();
    let (parts, sockets) = ids(&session);

    clock.set(12.0);
    session.insert(sockets[1], parts[1]);
    clock.set(15.0);
    session.insert(sockets[0], parts[0]);
    clock.set(16.0);
    session.insert(sockets[2], parts[2]);

    let entries = session.recorder().entries();
    assert_eq!(entries[0], TimingEntry::new("G1", "Bearing", 2.0));
    assert_eq!(entries[1], TimingEntry::new("G1", "Crankshaft", 5.0));
    assert_eq!(entries[2], TimingEntry::new("G2", "Head", 1.0));
}

#[test]
fn test_attach_pose_and_scale() {
    let clock = ManualClock::new(0.0);
    let mut session = start(ENGINE, &clock);
    let (parts, sockets) = ids(&session);

    session.insert(sockets[0], parts[0]);
    let crank = &session.parts()[parts[0].0];
    assert_eq!(crank.pose().position, [0.0, 0.5, 0.0]);

    session.insert(sockets[1], parts[1]);
    session.insert(sockets[2], parts[2]);
    let head = &session.parts()[parts[2].0];
    assert_eq!(head.pose().position, [0.0, 1.0, 0.0]);
    assert_eq!(head.pose().scale, [1.0, 2.0, 1.0]);
    assert_eq!(head.original_scale(), Some([1.0, 1.0, 1.0]));
}

#[test]
fn test_timings_appended_to_csv() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("TimeData").join("AssemblyTimes.csv");

    let clock = ManualClock::new(0.0);
    let file = AssemblyFile::from_yaml(ENGINE).unwrap();
    let mut session = SessionBuilder::new(&file)
        .unwrap()
        .clock(clock.clone())
        .sink(CsvTimingLog::open(&path).unwrap())
        .build();
    session.start();
    let (parts, sockets) = ids(&session);

    clock.set(1.5);
    session.insert(sockets[1], parts[1]);
    clock.set(2.0);
    session.insert(sockets[0], parts[0]);
    clock.set(4.0);
    session.insert(sockets[2], parts[2]);

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with(HEADER));
    assert_eq!(contents.lines().count(), 4);

    let entries = read_timing_log(&path).unwrap();
    assert_eq!(entries[0], TimingEntry::new("G1", "Bearing", 1.5));
    assert_eq!(entries[1], TimingEntry::new("G1", "Crankshaft", 0.5));
    assert_eq!(entries[2], TimingEntry::new("G2", "Head", 2.0));
}

#[test]
fn test_replay_script_from_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("engine.yaml");
    let script_path = dir.path().join("run.yaml");
    fs::write(&config_path, ENGINE).unwrap();
    fs::write(
        &script_path,
        r#"
steps:
  - { at: 1.0, event: grab_begin, part: Crankshaft }
  - { at: 1.5, event: enter_socket, part: Crankshaft, socket: BearingSocket }
  - { at: 2.0, event: grab_release, part: Crankshaft }
  - { at: 2.5, event: grab_begin, part: Crankshaft }
  - { at: 3.0, event: enter_socket, part: Crankshaft, socket: CrankSocket }
  - { at: 3.5, event: grab_release, part: Crankshaft }
  - { at: 4.0, event: insert, part: Bearing, socket: BearingSocket }
  - { at: 6.0, event: grab_begin, part: Head }
  - { at: 7.0, event: insert, part: Head, socket: HeadSocket }
"#,
    )
    .unwrap();

    let clock = ManualClock::new(0.0);
    let file = AssemblyFile::load(&config_path).unwrap();
    let mut session = SessionBuilder::new(&file)
        .unwrap()
        .clock(clock.clone())
        .build();
    session.start();

    let script = ReplayScript::load(&script_path).unwrap();
    let outcomes = script.run(&mut session, &clock);

    assert!(matches!(outcomes[1], Interaction::Ignored(Fault::Mismatch { .. })));
    assert!(matches!(outcomes[2], Interaction::Released { .. }));
    assert!(outcomes[5].is_assembled());
    assert!(outcomes[6].is_assembled());
    assert!(outcomes[8].is_assembled());
    assert!(session.is_finished());
    assert_eq!(session.report().total_line(), "Total time: 7.0s");
}

#[test]
fn test_toml_description() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("engine.toml");
    fs::write(
        &path,
        r#"
[assembly]
name = "Toml"

[[groups]]
id = "G1"
parts = [{ id = "P1" }]
sockets = [{ name = "S1" }]
"#,
    )
    .unwrap();

    let file = AssemblyFile::load(&path).unwrap();
    let clock = ManualClock::new(0.0);
    let mut session = SessionBuilder::new(&file)
        .unwrap()
        .clock(clock.clone())
        .build();
    session.start();

    let p1 = session.part_index("P1").unwrap();
    let s1 = session.socket_index("S1").unwrap();
    assert!(session.insert(s1, p1).is_assembled());
    assert!(session.is_finished());
}

#[test]
fn test_missing_instruction_shows_default() {
    let yaml = ENGINE.replace("  - { group: G2, title: \"Top end\", text: \"Fit the head\" }\n", "");
    let clock = ManualClock::new(0.0);
    let mut session = start(&yaml, &clock);
    let (parts, sockets) = ids(&session);

    session.insert(sockets[0], parts[0]);
    session.insert(sockets[1], parts[1]);

    assert!(!session.is_finished());
    assert_eq!(session.display().current(), ("Done", "Engine assembled"));
}

#[test]
fn test_replace_instructions_refreshes_head() {
    let clock = ManualClock::new(0.0);
    let mut session = start(ENGINE, &clock);

    let book = InstructionBook::from_list(vec![Instruction::new("G1", "Revised", "New text")]);
    session.replace_instructions(Box::new(book));

    assert_eq!(session.display().current(), ("Revised", "New text"));
}

#[test]
fn test_invalid_descriptions_rejected() {
    let typo = format!("order: [G1, G3]\n{}", ENGINE);
    let file = AssemblyFile::from_yaml(&typo).unwrap();
    assert!(SessionBuilder::new(&file).is_err());

    let slot = ENGINE.replace("slot: Bearing", "slot: Head");
    let file = AssemblyFile::from_yaml(&slot).unwrap();
    assert!(SessionBuilder::new(&file).is_err());
}
