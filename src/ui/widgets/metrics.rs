use crate::dashboard::MetricRow;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Widget},
};

/// Forecast accuracy table
pub struct MetricsWidget<'a> {
    rows: &'a [MetricRow],
}

impl<'a> MetricsWidget<'a> {
    pub fn new(rows: &'a [MetricRow]) -> Self {
        Self { rows }
    }
}

impl Widget for MetricsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Model Performance ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 20 || inner.height < 2 {
            return;
        }

        if self.rows.is_empty() {
            let msg = "No metrics yet";
            let x = inner.x + (inner.width.saturating_sub(msg.len() as u16)) / 2;
            let y = inner.y + inner.height / 2;
            buf.set_string(x, y, msg, Style::default().fg(Color::DarkGray));
            return;
        }

        // Header
        let header_style = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        let value_width = 10u16;
        let value_x = inner.x + inner.width - value_width;
        buf.set_string(inner.x + 1, inner.y, "METRIC", header_style);
        buf.set_string(value_x, inner.y, "VALUE", header_style);

        let name_width = value_x.saturating_sub(inner.x + 2) as usize;
        for (i, row) in self.rows.iter().enumerate() {
            let y = inner.y + 1 + i as u16;
            if y >= inner.y + inner.height {
                break;
            }

            let name: String = row.name.chars().take(name_width).collect();
            buf.set_string(
                inner.x + 1,
                y,
                &name,
                Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
            );
            buf.set_string(value_x, y, &row.value, Style::default().fg(Color::Cyan));
        }
    }
}
