use std::time::Duration;

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::hold::TimerPhase;
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::theme::Theme;

const GLYPH_HEIGHT: usize = 5;

fn glyph(ch: char) -> [&'static str; GLYPH_HEIGHT] {
    match ch {
        '0' => ["███", "█ █", "█ █", "█ █", "███"],
        '1' => ["  █", "  █", "  █", "  █", "  █"],
        '2' => ["███", "  █", "███", "█  ", "███"],
        '3' => ["███", "  █", "███", "  █", "███"],
        '4' => ["█ █", "█ █", "███", "  █", "  █"],
        '5' => ["███", "█  ", "███", "  █", "███"],
        '6' => ["███", "█  ", "███", "█ █", "███"],
        '7' => ["███", "  █", "  █", "  █", "  █"],
        '8' => ["███", "█ █", "███", "█ █", "███"],
        '9' => ["███", "█ █", "███", "  █", "███"],
        '.' => [" ", " ", " ", " ", "█"],
        ':' => [" ", "█", " ", "█", " "],
        _ => ["   ", "   ", "   ", "   ", "   "],
    }
}

/// Seconds with centisecond precision; minutes are split off past 60s.
pub fn format_elapsed(secs: f64) -> String {
    let centis = (secs.max(0.0) * 100.0).round() as u64;
    let minutes = centis / 6000;
    let rest = centis % 6000;
    if minutes > 0 {
        format!("{minutes}:{:02}.{:02}", rest / 100, rest % 100)
    } else {
        format!("{}.{:02}", rest / 100, rest % 100)
    }
}

/// Render `text` as rows of block glyphs, one space between glyphs.
pub fn big_text_rows(text: &str) -> Vec<String> {
    (0..GLYPH_HEIGHT)
        .map(|row| {
            text.chars()
                .map(|ch| glyph(ch)[row])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

pub struct TimerDisplay<'a> {
    elapsed: f64,
    phase: TimerPhase,
    hold_progress: f64,
    hold_duration: Duration,
    big_digits: bool,
    theme: &'a Theme,
}

impl<'a> TimerDisplay<'a> {
    pub fn new(elapsed: f64, phase: TimerPhase, theme: &'a Theme) -> Self {
        Self {
            elapsed,
            phase,
            hold_progress: 0.0,
            hold_duration: Duration::ZERO,
            big_digits: true,
            theme,
        }
    }

    pub fn hold(mut self, progress: f64, duration: Duration) -> Self {
        self.hold_progress = progress;
        self.hold_duration = duration;
        self
    }

    pub fn big_digits(mut self, big: bool) -> Self {
        self.big_digits = big;
        self
    }
}

impl Widget for TimerDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let bg = colors.phase_bg(self.phase);
        let fg = colors.phase_fg(self.phase);

        let block = Block::bordered()
            .title(" Timer ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(bg));
        let inner = block.inner(area);
        block.render(area, buf);

        let digits_height = if self.big_digits { GLYPH_HEIGHT as u16 } else { 1 };
        let show_bar = matches!(self.phase, TimerPhase::Holding | TimerPhase::Ready);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(digits_height),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(if show_bar { 3 } else { 0 }),
                Constraint::Min(0),
            ])
            .split(inner);

        let time = format_elapsed(self.elapsed);
        let digit_style = Style::default().fg(fg).bg(bg).add_modifier(Modifier::BOLD);
        let digit_lines: Vec<Line> = if self.big_digits {
            big_text_rows(&time)
                .into_iter()
                .map(|row| Line::from(Span::styled(row, digit_style)))
                .collect()
        } else {
            vec![Line::from(Span::styled(format!("{time}s"), digit_style))]
        };
        Paragraph::new(digit_lines)
            .centered()
            .render(layout[1], buf);

        Paragraph::new(Line::from(Span::styled(
            self.phase.label(),
            Style::default().fg(fg).bg(bg).add_modifier(Modifier::BOLD),
        )))
        .centered()
        .render(layout[3], buf);

        if self.phase == TimerPhase::Idle {
            let hint = format!(
                "Hold space or click for {:.1}s to prepare",
                self.hold_duration.as_secs_f64()
            );
            Paragraph::new(Line::from(Span::styled(
                hint,
                Style::default().fg(colors.text_muted()).bg(bg),
            )))
            .centered()
            .render(layout[4], buf);
        }

        if show_bar {
            let bar_area = Rect {
                x: layout[5].x + layout[5].width / 4,
                width: layout[5].width / 2,
                ..layout[5]
            };
            ProgressBar::new("Hold", self.hold_progress, self.theme).render(bar_area, buf);
        }
    }
}
