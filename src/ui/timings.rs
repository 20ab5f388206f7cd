// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Timing report widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

use crate::timing::TimingReport;

/// Widget showing recorded durations and their total
pub struct TimingWidget<'a> {
    report: &'a TimingReport,
    block: Option<Block<'a>>,
}

impl<'a> TimingWidget<'a> {
    /// Create a new timing widget
    pub fn new(report: &'a TimingReport) -> Self {
        Self {
            report,
            block: None,
        }
    }

    /// Set the block wrapper
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for TimingWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };

        if self.report.is_empty() {
            Paragraph::new("No parts assembled yet")
                .style(Style::default().fg(Color::DarkGray))
                .render(area, buf);
            return;
        }

        // Keep the total visible; drop the oldest lines when space runs out
        let room = (area.height as usize).saturating_sub(1);
        let all = self.report.lines();
        let skip = all.len().saturating_sub(room);

        let mut lines: Vec<Line> = all.into_iter().skip(skip).map(Line::from).collect();
        lines.push(Line::from(Span::styled(
            self.report.total_line(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));

        Paragraph::new(lines).render(area, buf);
    }
}
