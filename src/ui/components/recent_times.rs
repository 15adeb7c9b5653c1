use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::stats::RecentTime;
use crate::ui::theme::Theme;

pub const EMPTY_MESSAGE: &str = "No times recorded yet";

pub struct RecentTimes<'a> {
    rows: &'a [RecentTime],
    best: Option<f64>,
    theme: &'a Theme,
}

impl<'a> RecentTimes<'a> {
    /// `rows` newest first; the session best is highlighted.
    pub fn new(rows: &'a [RecentTime], best: Option<f64>, theme: &'a Theme) -> Self {
        Self { rows, best, theme }
    }
}

pub fn format_row(row: &RecentTime) -> String {
    format!(
        "#{}  {:.2}s  {}",
        row.ordinal,
        row.secs,
        row.finished_at.format("%H:%M:%S")
    )
}

impl Widget for RecentTimes<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Recent Times ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        let lines: Vec<Line> = if self.rows.is_empty() {
            vec![Line::from(Span::styled(
                format!(" {EMPTY_MESSAGE}"),
                Style::default().fg(colors.text_muted()),
            ))]
        } else {
            self.rows
                .iter()
                .map(|row| {
                    let style = if Some(row.secs) == self.best {
                        Style::default().fg(colors.success()).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(colors.fg())
                    };
                    Line::from(Span::styled(format!(" {}", format_row(row)), style))
                })
                .collect()
        };

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
