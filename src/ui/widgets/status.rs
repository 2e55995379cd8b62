use crate::dashboard::{Alert, AlertKind, SubmitState};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Widget},
};

/// Upload form and alert banner
pub struct StatusWidget<'a> {
    path: &'a str,
    editing: bool,
    submit: SubmitState,
    download_ready: bool,
    alert: Option<&'a Alert>,
}

impl<'a> StatusWidget<'a> {
    pub fn new(
        path: &'a str,
        editing: bool,
        submit: SubmitState,
        download_ready: bool,
        alert: Option<&'a Alert>,
    ) -> Self {
        Self {
            path,
            editing,
            submit,
            download_ready,
            alert,
        }
    }
}

fn alert_color(kind: AlertKind) -> Color {
    match kind {
        AlertKind::Success => Color::Green,
        AlertKind::Info => Color::Cyan,
        AlertKind::Warning => Color::Yellow,
        AlertKind::Danger => Color::Red,
    }
}

impl Widget for StatusWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Salescast ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 40 || inner.height < 2 {
            return;
        }

        let mut y = inner.y;

        // Submit button
        let button = format!("[ {} ]", self.submit.label());
        let button_style = if self.submit.is_processing() {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::DIM)
        } else {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        };
        let button_x = inner.x + inner.width - button.chars().count() as u16 - 1;
        buf.set_string(button_x, y, &button, button_style);

        // File path input
        let label = "File: ";
        buf.set_string(inner.x + 1, y, label, Style::default().fg(Color::Gray));
        let field_x = inner.x + 1 + label.len() as u16;
        let field_width = button_x.saturating_sub(field_x + 2) as usize;
        let shown = if self.path.is_empty() && !self.editing {
            "(press e to choose a CSV file)".to_string()
        } else {
            let cursor = if self.editing { "▏" } else { "" };
            let text = format!("{}{}", self.path, cursor);
            // Keep the tail of long paths visible
            let skip = text.chars().count().saturating_sub(field_width);
            text.chars().skip(skip).collect()
        };
        let field_style = if self.editing {
            Style::default().fg(Color::White).add_modifier(Modifier::UNDERLINED)
        } else if self.path.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        };
        let shown: String = shown.chars().take(field_width).collect();
        buf.set_string(field_x, y, &shown, field_style);

        y += 1;
        if y >= inner.y + inner.height {
            return;
        }

        // Alert banner
        if let Some(alert) = self.alert {
            let text = format!(
                "{} {}  (x to dismiss)",
                alert.kind.name().to_uppercase(),
                alert.message
            );
            let text: String = text.chars().take(inner.width as usize - 2).collect();
            buf.set_string(
                inner.x + 1,
                y,
                &text,
                Style::default().fg(alert_color(alert.kind)),
            );
        } else if self.download_ready {
            buf.set_string(
                inner.x + 1,
                y,
                "Forecast ready: press d to download the CSV",
                Style::default().fg(Color::Green),
            );
        }

        // Help text at the end
        if inner.width > 90 {
            let help = "? help  q quit";
            buf.set_string(
                inner.x + inner.width - help.len() as u16 - 1,
                y,
                help,
                Style::default().fg(Color::DarkGray),
            );
        }
    }
}
