//! Help overlay showing all keybindings

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// Help overlay widget
pub struct HelpOverlay;

impl HelpOverlay {
    pub fn new() -> Self {
        Self
    }

    /// Calculate centered rect for dialog
    fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
        let popup_layout = Layout::vertical([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

        Layout::horizontal([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
    }
}

impl Default for HelpOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for HelpOverlay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dialog_area = Self::centered_rect(60, 60, area);

        // Clear background
        Clear.render(dialog_area, buf);

        let block = Block::default()
            .title(" Help - Keybindings ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .style(Style::default().bg(Color::Black));

        let inner = block.inner(dialog_area);
        block.render(dialog_area, buf);

        let header_style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let desc_style = Style::default().fg(Color::White);
        let dim_style = Style::default().fg(Color::DarkGray);

        let entry = |key: &'static str, desc: &'static str| {
            Line::from(vec![
                Span::styled(key, key_style),
                Span::styled(desc, desc_style),
            ])
        };

        let lines = vec![
            Line::from(vec![Span::styled("FORECAST", header_style)]),
            Line::from(""),
            entry("  e         ", "Edit the path of the CSV file to upload"),
            entry("  Enter / u ", "Upload the file and generate a forecast"),
            entry("  d         ", "Download the forecast as CSV"),
            Line::from(""),
            Line::from(vec![Span::styled("OTHER", header_style)]),
            Line::from(""),
            entry("  x         ", "Dismiss the current alert"),
            entry("  ? / h     ", "Show this help"),
            entry("  q / Esc   ", "Quit (Esc leaves path editing)"),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Press any key to close this help",
                dim_style,
            )]),
        ];

        let paragraph = Paragraph::new(lines).alignment(Alignment::Left);

        paragraph.render(inner, buf);
    }
}
