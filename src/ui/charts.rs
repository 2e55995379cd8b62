use crate::charts::{ChartBody, ChartSpec, LineChart, SeasonalityChart};
use crate::seasonality::{ChartColor, ChartShape};
use crate::ui::widgets::radial::RadialChart;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Widget},
};

/// Lowest alpha used when blending chart colors onto the dark background
const MIN_ALPHA: f64 = 0.35;

/// Terminal color for a chart color, alpha-blended over black
pub fn to_color(color: ChartColor) -> Color {
    let (r, g, b) = color.to_rgb();
    let a = color.alpha().clamp(MIN_ALPHA, 1.0);
    let blend = |c: u8| (c as f64 * a).round() as u8;
    Color::Rgb(blend(r), blend(g), blend(b))
}

fn panel_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
}

/// One chart panel; draws whatever spec is live on its surface
pub struct ChartPanel<'a> {
    spec: Option<&'a ChartSpec>,
    placeholder: String,
}

impl<'a> ChartPanel<'a> {
    pub fn new(spec: Option<&'a ChartSpec>, placeholder: &str) -> Self {
        Self {
            spec,
            placeholder: format!(" {} ", placeholder),
        }
    }
}

impl Widget for ChartPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(spec) = self.spec else {
            let block = panel_block(self.placeholder.as_str());
            let inner = block.inner(area);
            block.render(area, buf);

            let msg = "No data";
            if inner.width as usize >= msg.len() && inner.height > 0 {
                let x = inner.x + (inner.width - msg.len() as u16) / 2;
                let y = inner.y + inner.height / 2;
                buf.set_string(x, y, msg, Style::default().fg(Color::DarkGray));
            }
            return;
        };

        let title = format!(" {} ", spec.title);
        match &spec.body {
            ChartBody::Line(chart) => ForecastChart::new(chart, &title).render(area, buf),
            ChartBody::Seasonality(chart) => match chart.series.shape {
                ChartShape::Bar => ImpactBars::new(chart, &title).render(area, buf),
                ChartShape::PolarArea | ChartShape::Pie | ChartShape::Doughnut => {
                    RadialChart::new(chart, &title).render(area, buf)
                }
            },
        }
    }
}

/// Actual sales, forecast and confidence bounds as line datasets
pub struct ForecastChart<'a> {
    chart: &'a LineChart,
    title: &'a str,
}

impl<'a> ForecastChart<'a> {
    pub fn new(chart: &'a LineChart, title: &'a str) -> Self {
        Self { chart, title }
    }
}

impl Widget for ForecastChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let points: Vec<Vec<(f64, f64)>> = self
            .chart
            .datasets
            .iter()
            .map(|d| {
                d.values
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| v.is_finite())
                    .map(|(i, v)| (i as f64, *v))
                    .collect()
            })
            .collect();

        let datasets: Vec<Dataset> = self
            .chart
            .datasets
            .iter()
            .zip(&points)
            .map(|(d, data)| {
                Dataset::default()
                    .name(d.label.as_str())
                    .marker(if d.dashed { Marker::Dot } else { Marker::Braille })
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(to_color(d.color)))
                    .data(data)
            })
            .collect();

        let (min, max) = self.chart.value_range().unwrap_or((0.0, 1.0));
        let padding = ((max - min) * 0.05).max(f64::EPSILON);
        let (y_min, y_max) = (min - padding, max + padding);

        let len = points
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.chart.labels.len()))
            .max()
            .unwrap_or(0);
        let x_max = (len.saturating_sub(1) as f64).max(1.0);

        let labels = &self.chart.labels;
        let x_labels: Vec<Span> = match labels.len() {
            0 => Vec::new(),
            1 => vec![Span::raw(labels[0].as_str())],
            n => vec![
                Span::raw(labels[0].as_str()),
                Span::raw(labels[n / 2].as_str()),
                Span::raw(labels[n - 1].as_str()),
            ],
        };

        let x_title = match self.chart.changepoints.len() {
            0 => self.chart.x_title.clone(),
            n => format!("{} ({} changepoints)", self.chart.x_title, n),
        };

        Chart::new(datasets)
            .block(panel_block(self.title))
            .x_axis(
                Axis::default()
                    .title(x_title)
                    .style(Style::default().fg(Color::Gray))
                    .bounds([0.0, x_max])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .title(self.chart.y_title.as_str())
                    .style(Style::default().fg(Color::Gray))
                    .bounds([y_min, y_max])
                    .labels(vec![
                        Span::raw(format!("{:.0}", y_min)),
                        Span::raw(format!("{:.0}", (y_min + y_max) / 2.0)),
                        Span::raw(format!("{:.0}", y_max)),
                    ]),
            )
            .render(area, buf);
    }
}

/// Signed vertical bars on a shared scale that does not force a zero baseline
pub struct ImpactBars<'a> {
    chart: &'a SeasonalityChart,
    title: &'a str,
}

impl<'a> ImpactBars<'a> {
    pub fn new(chart: &'a SeasonalityChart, title: &'a str) -> Self {
        Self { chart, title }
    }
}

impl Widget for ImpactBars<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = panel_block(self.title);
        let inner = block.inner(area);
        block.render(area, buf);

        let points = &self.chart.series.points;
        let label_width = 7u16;
        if points.is_empty() || inner.width < label_width + 4 || inner.height < 4 {
            return;
        }

        let values: Vec<f64> = points.iter().map(|p| p.value).collect();
        let Some((min, max)) = value_range(&values) else {
            return;
        };

        let plot = Rect {
            x: inner.x + label_width,
            y: inner.y,
            width: inner.width - label_width,
            height: inner.height - 1,
        };
        let baseline = 0.0_f64.clamp(min, max);
        let col_width = (plot.width / points.len() as u16).max(1);
        let bar_width = col_width.saturating_sub(1).max(1);

        for (i, point) in points.iter().enumerate() {
            let x0 = plot.x + i as u16 * col_width;
            if x0 + bar_width > plot.x + plot.width {
                break;
            }
            if !point.value.is_finite() {
                continue;
            }

            let from = value_to_row(baseline, min, max, plot.height);
            let to = value_to_row(point.value, min, max, plot.height);
            let (top, bottom) = (from.min(to), from.max(to));
            let color = to_color(point.color);

            for row in top..=bottom {
                for dx in 0..bar_width {
                    buf[(x0 + dx, plot.y + row)].set_char('█').set_fg(color);
                }
            }

            let label: String = point.label.chars().take(col_width as usize).collect();
            buf.set_string(
                x0,
                inner.y + inner.height - 1,
                &label,
                Style::default().fg(Color::Gray),
            );
        }

        // Value labels on the left: top, middle, bottom
        let axis_style = Style::default().fg(Color::DarkGray);
        let labels = [
            (0, max),
            (plot.height / 2, (min + max) / 2.0),
            (plot.height - 1, min),
        ];
        for (row, value) in labels {
            let text: String = format!("{:.2}", value)
                .chars()
                .take(label_width as usize - 1)
                .collect();
            buf.set_string(inner.x, plot.y + row, &text, axis_style);
        }
    }
}

/// Finite (min, max) padded by 5%; a flat series gets a unit range
fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    let min = finite.iter().copied().fold(f64::MAX, f64::min);
    let max = finite.iter().copied().fold(f64::MIN, f64::max);
    if min == max {
        return Some((min - 1.0, max + 1.0));
    }
    let padding = (max - min) * 0.05;
    Some((min - padding, max + padding))
}

/// Row inside a plot of `height` rows (0 is the top) for `value`
fn value_to_row(value: f64, min: f64, max: f64, height: u16) -> u16 {
    let span = (height.saturating_sub(1)) as f64;
    let frac = ((max - value) / (max - min)).clamp(0.0, 1.0);
    (frac * span).round() as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seasonality::{palette, SeasonalityComponent};

    #[test]
    fn test_value_range() {
        assert_eq!(value_range(&[]), None);
        assert_eq!(value_range(&[f64::NAN]), None);
        assert_eq!(value_range(&[2.0, 2.0]), Some((1.0, 3.0)));

        let (min, max) = value_range(&[-10.0, 10.0]).unwrap();
        assert!((min + 11.0).abs() < 1e-9);
        assert!((max - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_value_to_row() {
        assert_eq!(value_to_row(10.0, 0.0, 10.0, 11), 0);
        assert_eq!(value_to_row(0.0, 0.0, 10.0, 11), 10);
        assert_eq!(value_to_row(5.0, 0.0, 10.0, 11), 5);
        assert_eq!(value_to_row(50.0, 0.0, 10.0, 11), 0);
    }

    #[test]
    fn test_muted_color_is_darker() {
        let Color::Rgb(r, _, _) = to_color(palette::MUTED) else {
            panic!("expected rgb");
        };
        assert!(r < 201);
        assert_eq!(to_color(palette::ACTUAL_LINE), Color::Rgb(75, 192, 192));
    }

    #[test]
    fn test_bars_render_signed_values() {
        let spec = ChartSpec::seasonality(SeasonalityComponent::Yearly, &[5.0, -10.0, 3.0]).unwrap();
        let area = Rect::new(0, 0, 40, 12);
        let mut buf = Buffer::empty(area);

        ChartPanel::new(Some(&spec), "yearly").render(area, &mut buf);

        let bottom_labels: String = (0..40).map(|x| buf[(x, 10)].symbol().to_string()).collect();
        assert!(bottom_labels.contains("Jan"));
        assert!(bottom_labels.contains("Mar"));
        let bars = (0..40)
            .flat_map(|x| (0..12).map(move |y| (x, y)))
            .filter(|&(x, y)| buf[(x, y)].symbol() == "█")
            .count();
        assert!(bars > 0);
    }

    #[test]
    fn test_empty_panel_placeholder() {
        let area = Rect::new(0, 0, 20, 5);
        let mut buf = Buffer::empty(area);

        ChartPanel::new(None, "Weekly Pattern").render(area, &mut buf);

        let middle: String = (0..20).map(|x| buf[(x, 2)].symbol().to_string()).collect();
        assert!(middle.contains("No data"));
    }
}
