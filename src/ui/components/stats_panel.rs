use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::stats::{StatsSummary, format_stat};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatsSource {
    /// Summary fetched from the backend for the logged-in user.
    AllTime,
    /// Computed from this run's times.
    Session,
}

impl StatsSource {
    pub fn title(self) -> &'static str {
        match self {
            StatsSource::AllTime => " Statistics (all time) ",
            StatsSource::Session => " Statistics (session) ",
        }
    }
}

pub struct StatsPanel<'a> {
    summary: StatsSummary,
    source: StatsSource,
    theme: &'a Theme,
}

impl<'a> StatsPanel<'a> {
    pub fn new(summary: StatsSummary, source: StatsSource, theme: &'a Theme) -> Self {
        Self {
            summary,
            source,
            theme,
        }
    }

    /// Rows the panel occupies, borders included.
    pub const HEIGHT: u16 = 6;
}

impl Widget for StatsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let rows = [
            ("Best:     ", self.summary.best, colors.success()),
            ("Worst:    ", self.summary.worst, colors.error()),
            ("Avg of 5: ", self.summary.avg5, colors.accent()),
            ("Avg of 12:", self.summary.avg12, colors.accent()),
        ];
        let lines: Vec<Line> = rows
            .into_iter()
            .map(|(label, value, color)| {
                let shown = format_stat(value);
                let value_color = if shown == "--" { colors.text_muted() } else { color };
                Line::from(vec![
                    Span::styled(format!(" {label} "), Style::default().fg(colors.fg())),
                    Span::styled(shown, Style::default().fg(value_color)),
                ])
            })
            .collect();

        let block = Block::bordered()
            .title(self.source.title())
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        Paragraph::new(lines).block(block).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(summary: StatsSummary, source: StatsSource) -> String {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 32, StatsPanel::HEIGHT);
        let mut buf = Buffer::empty(area);
        StatsPanel::new(summary, source, &theme).render(area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_missing_values_render_as_dashes() {
        let text = rendered(StatsSummary::default(), StatsSource::Session);
        assert!(text.contains("Best:"));
        assert!(text.contains("--"));
        assert!(text.contains("session"));
    }

    #[test]
    fn test_values_render_with_two_decimals() {
        let summary = StatsSummary {
            best: Some(9.87),
            worst: Some(15.0),
            avg5: Some(12.345),
            avg12: None,
        };
        let text = rendered(summary, StatsSource::AllTime);
        assert!(text.contains("9.87s"));
        assert!(text.contains("15.00s"));
        assert!(text.contains("all time"));
    }
}
