use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::engine::scramble::Scramble;
use crate::ui::theme::Theme;

pub struct ScramblePanel<'a> {
    scramble: &'a Scramble,
    theme: &'a Theme,
}

impl<'a> ScramblePanel<'a> {
    pub fn new(scramble: &'a Scramble, theme: &'a Theme) -> Self {
        Self { scramble, theme }
    }

    /// Rows needed at `width`, borders included.
    pub fn height_for(scramble: &Scramble, width: u16) -> u16 {
        let inner = width.saturating_sub(2) as usize;
        let lines = crate::ui::layout::wrapped_line_count(&scramble.to_string(), inner);
        lines as u16 + 2
    }
}

impl Widget for ScramblePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" Scramble ({} moves) ", self.scramble.len()))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        let spans: Vec<Span> = self
            .scramble
            .moves()
            .iter()
            .enumerate()
            .flat_map(|(i, mv)| {
                let sep = if i == 0 { "" } else { " " };
                [
                    Span::raw(sep),
                    Span::styled(
                        mv.to_string(),
                        Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
                    ),
                ]
            })
            .collect();

        Paragraph::new(Line::from(spans))
            .block(block)
            .wrap(Wrap { trim: true })
            .centered()
            .render(area, buf);
    }
}
