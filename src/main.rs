// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use assembly_seq::config::{validate_config, AssemblyFile, ConfigWatcher};
use assembly_seq::recording::{read_timing_log, CsvTimingLog};
use assembly_seq::sequencer::{Interaction, ReplayScript, SessionBuilder};
use assembly_seq::timing::{ManualClock, TimingReport};
use assembly_seq::ui::App;

/// Log file used while the terminal UI owns the screen
const TUI_LOG_FILE: &str = "asmseq.log";

fn print_usage() {
    println!("asmseq - Guided assembly sequencer");
    println!();
    println!("Usage: asmseq [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --run <CONFIG>                    Assemble interactively in the terminal");
    println!("  --replay <CONFIG> <SCRIPT> [CSV]  Replay a scripted session, optionally logging times");
    println!("  --report <CSV>                    Print a sorted report of a timing log");
    println!("  --validate <CONFIG>               Check an assembly description");
    println!("  --help                            Show this help message");
    println!();
    println!("Logging is controlled by RUST_LOG (default: info).");
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Log to stderr for headless commands
fn init_stderr_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter())
        .init();
}

/// Log to a file so the terminal UI is not corrupted
fn init_file_tracing(path: &Path) {
    let file = OpenOptions::new().create(true).append(true).open(path);
    match file {
        Ok(file) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(env_filter())
                .init();
            tracing::info!(path = %path.display(), "Logging initialized");
        }
        // No logs rather than writing over the UI
        Err(_) => tracing_subscriber::registry().with(env_filter()).init(),
    }
}

fn print_report(report: &TimingReport) {
    if report.is_empty() {
        println!("No timing records.");
        return;
    }
    for line in report.lines() {
        println!("{}", line);
    }
    println!("{}", report.total_line());
}

fn run_interactive(config_path: &Path) -> Result<()> {
    let file = AssemblyFile::load(config_path)?;
    let log_path = file.timing_log_path();
    let sink = CsvTimingLog::open(&log_path)
        .with_context(|| format!("Failed to open timing log {:?}", log_path))?;

    let mut session = SessionBuilder::new(&file)?.sink(sink).build();

    let watcher = match ConfigWatcher::new(config_path, None) {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            tracing::warn!("Hot-reload disabled: {:#}", e);
            None
        }
    };

    session.start();
    {
        let mut app = App::new()?;
        app.run(&mut session, watcher.as_ref())?;
    }

    print_report(&session.report());
    if session.is_finished() {
        println!("Times appended to {}", log_path.display());
    }
    Ok(())
}

fn replay(config_path: &Path, script_path: &Path, csv: Option<&Path>) -> Result<()> {
    let file = AssemblyFile::load(config_path)?;
    let script = ReplayScript::load(script_path)?;

    let clock = ManualClock::new(0.0);
    let mut builder = SessionBuilder::new(&file)?.clock(clock.clone());
    if let Some(path) = csv {
        let sink = CsvTimingLog::open(path)
            .with_context(|| format!("Failed to open timing log {:?}", path))?;
        builder = builder.sink(sink);
    }
    let mut session = builder.build();

    session.start();
    let outcomes = script.run(&mut session, &clock);

    let assembled = outcomes.iter().filter(|o| o.is_assembled()).count();
    let faults = outcomes
        .iter()
        .filter(|o| matches!(o, Interaction::Rejected { .. } | Interaction::Ignored(_)))
        .count();
    println!(
        "{}: {} steps, {} parts assembled, {} rejected or ignored",
        session.name(),
        outcomes.len(),
        assembled,
        faults
    );
    print_report(&session.report());

    if !session.is_finished() {
        println!("Assembly incomplete.");
    }
    Ok(())
}

fn report(csv: &Path) -> Result<()> {
    let entries =
        read_timing_log(csv).with_context(|| format!("Failed to read timing log {:?}", csv))?;
    print_report(&TimingReport::new(entries));
    Ok(())
}

fn validate(config_path: &Path) -> Result<()> {
    let file = validate_config(config_path)?;
    let sockets: usize = file.groups.iter().map(|g| g.sockets.len()).sum();
    println!(
        "{}: {:?} mode, {} groups, {} parts, {} sockets, {} instructions",
        file.assembly.name,
        file.assembly.mode,
        file.groups.len(),
        file.part_count(),
        sockets,
        file.instructions.len()
    );
    Ok(())
}

fn require(args: &[String], index: usize, what: &str) -> Result<PathBuf> {
    args.get(index)
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("{} requires {}", args[1], what))
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("asmseq - Guided assembly sequencer");
        println!("Run with --help for usage information");
        return Ok(());
    }

    match args[1].as_str() {
        "--run" => {
            let config = require(&args, 2, "a configuration path")?;
            init_file_tracing(Path::new(TUI_LOG_FILE));
            run_interactive(&config)?;
        }
        "--replay" => {
            let config = require(&args, 2, "a configuration path")?;
            let script = require(&args, 3, "a script path")?;
            init_stderr_tracing();
            replay(&config, &script, args.get(4).map(Path::new))?;
        }
        "--report" => {
            let csv = require(&args, 2, "a timing log path")?;
            init_stderr_tracing();
            report(&csv)?;
        }
        "--validate" => {
            let config = require(&args, 2, "a configuration path")?;
            init_stderr_tracing();
            validate(&config)?;
        }
        "--help" | "-h" => {
            print_usage();
        }
        _ => {
            eprintln!("Unknown option: {}", args[1]);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
