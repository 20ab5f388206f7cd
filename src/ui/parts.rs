// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Part and socket list widgets.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Paragraph, Widget},
};

use crate::assembly::{AssemblyState, Part, Socket};

/// Widget listing every part with its state
pub struct PartsWidget<'a> {
    parts: &'a [Part],
    selected: Option<usize>,
    block: Option<Block<'a>>,
}

impl<'a> PartsWidget<'a> {
    /// Create a new parts widget
    pub fn new(parts: &'a [Part]) -> Self {
        Self {
            parts,
            selected: None,
            block: None,
        }
    }

    /// Set selected part index
    pub fn selected(mut self, index: Option<usize>) -> Self {
        self.selected = index;
        self
    }

    /// Set the block wrapper
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for PartsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };

        if self.parts.is_empty() {
            Paragraph::new("No parts configured")
                .style(Style::default().fg(Color::DarkGray))
                .render(area, buf);
            return;
        }

        let rows = visible_rows(self.parts.len(), self.selected, area.height);
        for (row, index) in rows.enumerate() {
            let row_area = Rect::new(area.x, area.y + row as u16, area.width, 1);
            render_part_row(row_area, buf, &self.parts[index], self.selected == Some(index));
        }
    }
}

fn render_part_row(area: Rect, buf: &mut Buffer, part: &Part, selected: bool) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(2),  // Cursor
            Constraint::Min(12),    // Id
            Constraint::Length(10), // Group
            Constraint::Length(8),  // State
        ])
        .split(area);

    let cursor = if selected { ">" } else { " " };
    Paragraph::new(cursor)
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .render(chunks[0], buf);

    let (label, style) = part_status(part);
    let id_style = if selected {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    };
    Paragraph::new(part.id()).style(id_style).render(chunks[1], buf);
    Paragraph::new(part.group_id())
        .style(Style::default().fg(Color::Cyan))
        .render(chunks[2], buf);
    Paragraph::new(Span::styled(label, style)).render(chunks[3], buf);
}

/// Short status label and colour for a part
pub fn part_status(part: &Part) -> (&'static str, Style) {
    match part.state() {
        AssemblyState::Locked => ("locked", Style::default().fg(Color::DarkGray)),
        AssemblyState::Unlocked if part.is_held() => (
            "held",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        AssemblyState::Unlocked => ("ready", Style::default().fg(Color::Green)),
        AssemblyState::Assembled => ("fixed", Style::default().fg(Color::Blue)),
    }
}

/// Widget listing every socket with its occupancy
pub struct SocketsWidget<'a> {
    sockets: &'a [Socket],
    parts: &'a [Part],
    selected: Option<usize>,
    block: Option<Block<'a>>,
}

impl<'a> SocketsWidget<'a> {
    /// Create a new sockets widget. Parts are used to name occupants.
    pub fn new(sockets: &'a [Socket], parts: &'a [Part]) -> Self {
        Self {
            sockets,
            parts,
            selected: None,
            block: None,
        }
    }

    /// Set selected socket index
    pub fn selected(mut self, index: Option<usize>) -> Self {
        self.selected = index;
        self
    }

    /// Set the block wrapper
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn describe(&self, socket: &Socket) -> (String, Style) {
        let name_of = |index: crate::assembly::PartIndex| {
            self.parts
                .get(index.0)
                .map_or("?", |part| part.id())
                .to_string()
        };

        if let Some(occupant) = socket.occupant() {
            (
                format!("holds {}", name_of(occupant)),
                Style::default().fg(Color::Blue),
            )
        } else if let Some(hover) = socket.hover() {
            (
                format!("over {}", name_of(hover)),
                Style::default().fg(Color::Yellow),
            )
        } else if socket.is_active() {
            ("open".to_string(), Style::default().fg(Color::Green))
        } else {
            ("inactive".to_string(), Style::default().fg(Color::DarkGray))
        }
    }
}

impl Widget for SocketsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };

        if self.sockets.is_empty() {
            Paragraph::new("No sockets configured")
                .style(Style::default().fg(Color::DarkGray))
                .render(area, buf);
            return;
        }

        let rows = visible_rows(self.sockets.len(), self.selected, area.height);
        for (row, index) in rows.enumerate() {
            let socket = &self.sockets[index];
            let selected = self.selected == Some(index);
            let row_area = Rect::new(area.x, area.y + row as u16, area.width, 1);

            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Length(2),
                    Constraint::Min(14),
                    Constraint::Length(16),
                ])
                .split(row_area);

            let (status, style) = self.describe(socket);
            let cursor = if selected { ">" } else { " " };
            Paragraph::new(cursor)
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
                .render(chunks[0], buf);

            let name_style = if selected {
                style.add_modifier(Modifier::BOLD)
            } else {
                style
            };
            Paragraph::new(socket.name()).style(name_style).render(chunks[1], buf);
            Paragraph::new(status).style(style).render(chunks[2], buf);
        }
    }
}

/// Indices of the rows that fit, scrolled so the selection stays visible
fn visible_rows(len: usize, selected: Option<usize>, height: u16) -> std::ops::Range<usize> {
    let height = height as usize;
    if len <= height {
        return 0..len;
    }
    let selected = selected.unwrap_or(0).min(len - 1);
    let start = selected.saturating_sub(height.saturating_sub(1));
    start..(start + height).min(len)
}
