// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Instruction panel widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget, Wrap},
};

use crate::instructions::InstructionDisplay;

/// Widget showing the current instruction title and text
pub struct InstructionWidget<'a> {
    title: &'a str,
    text: &'a str,
    block: Option<Block<'a>>,
}

impl<'a> InstructionWidget<'a> {
    /// Create a widget for an explicit title and text
    pub fn new(title: &'a str, text: &'a str) -> Self {
        Self {
            title,
            text,
            block: None,
        }
    }

    /// Create a widget showing whatever a display currently holds
    pub fn from_display(display: &'a dyn InstructionDisplay) -> Self {
        let (title, text) = display.current();
        Self::new(title, text)
    }

    /// Set the block wrapper
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for InstructionWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };

        let mut lines = vec![Line::from(Span::styled(
            self.title,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))];
        if !self.text.is_empty() {
            lines.push(Line::from(""));
            lines.extend(self.text.lines().map(Line::from));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
