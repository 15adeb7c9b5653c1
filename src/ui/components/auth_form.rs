use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::form::Form;
use crate::ui::theme::Theme;

pub struct AuthForm<'a> {
    form: &'a Form,
    logged_in_as: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> AuthForm<'a> {
    pub fn new(form: &'a Form, theme: &'a Theme) -> Self {
        Self {
            form,
            logged_in_as: None,
            theme,
        }
    }

    pub fn logged_in_as(mut self, name: Option<&'a str>) -> Self {
        self.logged_in_as = name;
        self
    }
}

impl Widget for AuthForm<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.form.kind.title()))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut constraints = vec![Constraint::Length(1)];
        constraints.extend(self.form.fields.iter().map(|_| Constraint::Length(3)));
        constraints.push(Constraint::Length(2));
        constraints.push(Constraint::Min(0));
        constraints.push(Constraint::Length(1));
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        for (i, field) in self.form.fields.iter().enumerate() {
            let focused = i == self.form.focused;
            let border = if focused {
                colors.border_focused()
            } else {
                colors.border()
            };
            let field_block = Block::bordered()
                .title(format!(" {} ", field.label))
                .border_style(Style::default().fg(border));

            let (before, cursor, after) = field.input.render_parts();
            let text_style = Style::default().fg(colors.fg());
            let mut spans = vec![Span::styled(before, text_style)];
            if focused && !self.form.pending {
                let cursor_style = Style::default().fg(colors.bg()).bg(colors.fg());
                spans.push(Span::styled(cursor.unwrap_or(' ').to_string(), cursor_style));
            } else if let Some(ch) = cursor {
                spans.push(Span::styled(ch.to_string(), text_style));
            }
            spans.push(Span::styled(after, text_style));

            Paragraph::new(Line::from(spans))
                .block(field_block)
                .render(layout[i + 1], buf);
        }

        let status_area = layout[self.form.fields.len() + 1];
        let mut status_lines = Vec::new();
        if let Some(ref status) = self.form.status {
            let color = if status.is_error {
                colors.error()
            } else {
                colors.success()
            };
            status_lines.push(Line::from(Span::styled(
                format!(" {}", status.message),
                Style::default().fg(color),
            )));
        }
        if let Some(name) = self.logged_in_as {
            status_lines.push(Line::from(vec![
                Span::styled(" Logged in as ", Style::default().fg(colors.text_muted())),
                Span::styled(
                    name.to_string(),
                    Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
                ),
            ]));
        }
        Paragraph::new(status_lines).render(status_area, buf);

        let footer_area = layout[layout.len() - 1];
        Paragraph::new(Line::from(Span::styled(
            " [Tab] Next field  [Enter] Submit  [Esc] Back",
            Style::default().fg(colors.text_muted()),
        )))
        .render(footer_area, buf);
    }
}
