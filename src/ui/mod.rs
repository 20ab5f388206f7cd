// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Terminal UI for interactive assembly.
//!
//! Provides a ratatui-based terminal interface with the current
//! instruction, part and socket lists, and the timing report. Keys stand
//! in for the grab, hover, and release gestures of a 3D front end.

mod instructions;
mod parts;
mod timings;

pub use instructions::InstructionWidget;
pub use parts::{part_status, PartsWidget, SocketsWidget};
pub use timings::TimingWidget;

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use crate::assembly::{PartIndex, SocketIndex};
use crate::config::{ConfigEvent, ConfigWatcher};
use crate::sequencer::{Interaction, Session};

/// UI-only state: selection, overlays, and the status line
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Selected part row
    pub selected_part: usize,
    /// Selected socket row
    pub selected_socket: usize,
    /// Help text visible
    pub show_help: bool,
    /// Status message
    pub status_message: Option<String>,
    /// Status message timestamp
    pub status_time: Option<Instant>,
}

impl UiState {
    /// Set a status message that will be displayed temporarily
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_time = Some(Instant::now());
    }

    /// Clear expired status message
    pub fn clear_expired_status(&mut self) {
        if let Some(time) = self.status_time {
            if time.elapsed() > Duration::from_secs(3) {
                self.status_message = None;
                self.status_time = None;
            }
        }
    }
}

/// Key event result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// No action needed
    None,
    /// Quit the application
    Quit,
    /// Select the previous part
    PrevPart,
    /// Select the next part
    NextPart,
    /// Select the previous socket
    PrevSocket,
    /// Select the next socket
    NextSocket,
    /// Grab the selected part, or release it if held
    ToggleGrab,
    /// Move the selected part over the selected socket
    Hover,
    /// Move the selected part out of the selected socket
    Leave,
    /// Drop the selected part straight into the selected socket
    Insert,
    /// Toggle help
    ToggleHelp,
}

/// Translate a key press into an action
pub fn map_key(code: KeyCode, modifiers: KeyModifiers) -> KeyAction {
    match (code, modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE)
        | (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,

        (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::NONE) => KeyAction::PrevPart,
        (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::NONE) => KeyAction::NextPart,
        (KeyCode::Left, _) => KeyAction::PrevSocket,
        (KeyCode::Right, _) | (KeyCode::Tab, _) => KeyAction::NextSocket,

        (KeyCode::Char(' '), KeyModifiers::NONE) => KeyAction::ToggleGrab,
        (KeyCode::Enter, _) => KeyAction::Hover,
        (KeyCode::Backspace, _) => KeyAction::Leave,
        (KeyCode::Char('i'), KeyModifiers::NONE) => KeyAction::Insert,

        (KeyCode::Char('?'), _) | (KeyCode::Char('h'), KeyModifiers::NONE) => {
            KeyAction::ToggleHelp
        }

        _ => KeyAction::None,
    }
}

/// Apply an action to the session, updating selection and status.
///
/// Returns the session's answer when the action was an assembly event.
pub fn apply_action(
    state: &mut UiState,
    session: &mut Session,
    action: KeyAction,
) -> Option<Interaction> {
    let part_count = session.parts().len();
    let socket_count = session.sockets().len();
    let part = PartIndex(state.selected_part);
    let socket = SocketIndex(state.selected_socket);

    let outcome = match action {
        KeyAction::None | KeyAction::Quit => None,
        KeyAction::PrevPart => {
            state.selected_part = step_back(state.selected_part, part_count);
            None
        }
        KeyAction::NextPart => {
            state.selected_part = step_forward(state.selected_part, part_count);
            None
        }
        KeyAction::PrevSocket => {
            state.selected_socket = step_back(state.selected_socket, socket_count);
            None
        }
        KeyAction::NextSocket => {
            state.selected_socket = step_forward(state.selected_socket, socket_count);
            None
        }
        KeyAction::ToggleHelp => {
            state.show_help = !state.show_help;
            None
        }
        KeyAction::ToggleGrab => {
            let held = session.part(part).is_some_and(|p| p.is_held());
            Some(if held {
                session.grab_release(part)
            } else {
                session.grab_begin(part)
            })
        }
        KeyAction::Hover => Some(session.enter_socket(socket, part)),
        KeyAction::Leave => Some(session.exit_socket(socket, part)),
        KeyAction::Insert => Some(session.insert(socket, part)),
    };

    if let Some(interaction) = &outcome {
        state.set_status(describe(session, interaction));
    }
    outcome
}

fn step_forward(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        (index + 1) % len
    }
}

fn step_back(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        (index + len - 1) % len
    }
}

/// One-line summary of an interaction for the status bar
pub fn describe(session: &Session, interaction: &Interaction) -> String {
    let part_name = |part: PartIndex| session.part(part).map_or("?", |p| p.id()).to_string();
    let socket_name =
        |socket: SocketIndex| session.socket(socket).map_or("?", |s| s.name()).to_string();

    match interaction {
        Interaction::Grabbed { part } => format!("Holding {}", part_name(*part)),
        Interaction::Hovering { part, socket } => {
            format!("{} is over {}", part_name(*part), socket_name(*socket))
        }
        Interaction::Exited { part, socket } => {
            format!("{} left {}", part_name(*part), socket_name(*socket))
        }
        Interaction::Released { part } => format!("Released {}", part_name(*part)),
        Interaction::Assembled {
            part,
            socket,
            finished,
            ..
        } => {
            if *finished {
                "Assembly complete".to_string()
            } else {
                format!("{} fixed into {}", part_name(*part), socket_name(*socket))
            }
        }
        Interaction::Rejected { fault, .. } => format!("Rejected: {}", fault),
        Interaction::Ignored(fault) => format!("Ignored: {}", fault),
    }
}

/// Terminal UI application
pub struct App {
    /// UI state
    state: UiState,
    /// Terminal handle
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Target frame rate
    frame_rate: u32,
    /// Whether to continue running
    running: bool,
}

impl App {
    /// Take over the terminal
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            state: UiState::default(),
            terminal,
            frame_rate: 30,
            running: true,
        })
    }

    /// Stop the app
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Drive a session until the user quits.
    ///
    /// Reloaded descriptions from the watcher replace the instructions only.
    pub fn run(&mut self, session: &mut Session, watcher: Option<&ConfigWatcher>) -> io::Result<()> {
        while self.running {
            if let Some(watcher) = watcher {
                for event in watcher.recv_all() {
                    match event {
                        ConfigEvent::Reloaded(file) => {
                            session.replace_instructions(Box::new(file.instruction_book()));
                            self.state.set_status("Instructions reloaded");
                        }
                        ConfigEvent::Error(message) => self.state.set_status(message),
                    }
                }
            }

            self.state.clear_expired_status();
            self.draw(session)?;

            if let Some(Event::Key(key)) = self.poll_event()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let action = map_key(key.code, key.modifiers);
                if action == KeyAction::Quit {
                    self.quit();
                    continue;
                }
                apply_action(&mut self.state, session, action);
            }
        }
        Ok(())
    }

    /// Poll for events with timeout
    pub fn poll_event(&self) -> io::Result<Option<Event>> {
        let timeout = Duration::from_millis(1000 / self.frame_rate as u64);
        if event::poll(timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }

    /// Draw the UI
    pub fn draw(&mut self, session: &Session) -> io::Result<()> {
        let state = &self.state;
        self.terminal.draw(|frame| {
            let area = frame.area();

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3), // Progress
                    Constraint::Length(7), // Instruction
                    Constraint::Min(6),    // Parts and sockets
                    Constraint::Length(8), // Timings
                    Constraint::Length(1), // Status bar
                ])
                .split(area);

            render_progress(frame, chunks[0], session);

            frame.render_widget(
                InstructionWidget::from_display(session.display())
                    .block(Block::default().borders(Borders::ALL).title(" Instruction ")),
                chunks[1],
            );

            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(chunks[2]);
            frame.render_widget(
                PartsWidget::new(session.parts())
                    .selected(Some(state.selected_part))
                    .block(Block::default().borders(Borders::ALL).title(" Parts ")),
                columns[0],
            );
            frame.render_widget(
                SocketsWidget::new(session.sockets(), session.parts())
                    .selected(Some(state.selected_socket))
                    .block(Block::default().borders(Borders::ALL).title(" Sockets ")),
                columns[1],
            );

            let report = session.report();
            frame.render_widget(
                TimingWidget::new(&report)
                    .block(Block::default().borders(Borders::ALL).title(" Timings ")),
                chunks[3],
            );

            render_status_bar(frame, chunks[4], state);

            if state.show_help {
                render_help_overlay(frame, area);
            }
        })?;

        Ok(())
    }

    /// Restore the terminal
    fn cleanup(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Render the header with the active unit and progress
fn render_progress(frame: &mut Frame, area: Rect, session: &Session) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", session.name()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let sequencer = session.sequencer();
    let unit = if session.is_finished() {
        Span::styled(
            "■ DONE",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )
    } else {
        match session.active_unit() {
            Some(unit) => Span::styled(
                format!("▶ {}", session.unit_label(unit)),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            None => Span::styled("- idle", Style::default().fg(Color::DarkGray)),
        }
    };

    let line = Line::from(vec![
        unit,
        Span::raw("   "),
        Span::styled(
            format!("{}/{} units", sequencer.completed(), sequencer.total()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("   "),
        Span::styled(
            format!("{:.1}s", session.now()),
            Style::default().fg(Color::Magenta),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

/// Render status bar
fn render_status_bar(frame: &mut Frame, area: Rect, state: &UiState) {
    let text = match &state.status_message {
        Some(msg) => Span::styled(msg.as_str(), Style::default().fg(Color::Yellow)),
        None => Span::styled(
            " Up/Dn: Part | Lt/Rt: Socket | Space: Grab/Release | Enter: Hover | i: Insert | h: Help | q: Quit",
            Style::default().fg(Color::DarkGray),
        ),
    };

    frame.render_widget(Paragraph::new(text), area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let width = 50.min(area.width.saturating_sub(4));
    let height = 15.min(area.height.saturating_sub(4));
    let x = (area.width - width) / 2;
    let y = (area.height - height) / 2;
    let help_area = Rect::new(x, y, width, height);

    frame.render_widget(
        Block::default().style(Style::default().bg(Color::Black)),
        help_area,
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let help_text = vec![
        Line::from(Span::styled("Selection", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  Up/Down, j/k  Select part"),
        Line::from("  Left/Right    Select socket"),
        Line::from(""),
        Line::from(Span::styled("Assembly", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  Space         Grab / release part"),
        Line::from("  Enter         Hover part over socket"),
        Line::from("  Backspace     Move part out of socket"),
        Line::from("  i             Insert part into socket"),
        Line::from(""),
        Line::from(Span::styled("Other", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  h/?           Toggle help"),
        Line::from("  q/Ctrl+c      Quit"),
    ];

    frame.render_widget(Paragraph::new(help_text), inner);
}
