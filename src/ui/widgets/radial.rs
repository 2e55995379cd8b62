//! Polar-area and pie charts drawn with braille points on a canvas

use crate::charts::SeasonalityChart;
use crate::seasonality::ChartShape;
use crate::ui::charts::to_color;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Points},
        Block, Borders, Widget,
    },
};
use std::f64::consts::TAU;

const RADIAL_STEPS: usize = 24;
const ANGLE_STEPS_PER_TURN: f64 = 160.0;
const DOUGHNUT_HOLE: f64 = 0.5;
const LEGEND_WIDTH: u16 = 20;

/// Angular slice of a radial chart, angles in radians from 12 o'clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wedge {
    pub start: f64,
    pub end: f64,
    pub inner: f64,
    pub outer: f64,
}

/// Wedge geometry for `values` (already non-negative).
///
/// Polar area: equal angles, radius proportional to the value.
/// Pie and doughnut: full radius, angle proportional to the share.
pub fn wedges(shape: ChartShape, values: &[f64]) -> Vec<Wedge> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }

    match shape {
        ChartShape::PolarArea => {
            let max = values.iter().copied().filter(|v| v.is_finite()).fold(0.0, f64::max);
            let step = TAU / n as f64;
            values
                .iter()
                .enumerate()
                .map(|(i, v)| Wedge {
                    start: i as f64 * step,
                    end: (i + 1) as f64 * step,
                    inner: 0.0,
                    outer: if max > 0.0 && v.is_finite() { v / max } else { 0.0 },
                })
                .collect()
        }
        ChartShape::Pie | ChartShape::Doughnut | ChartShape::Bar => {
            let inner = if shape == ChartShape::Doughnut {
                DOUGHNUT_HOLE
            } else {
                0.0
            };
            let total: f64 = values.iter().copied().filter(|v| v.is_finite()).sum();
            if total <= 0.0 {
                return Vec::new();
            }
            let mut start = 0.0;
            values
                .iter()
                .map(|v| {
                    let share = if v.is_finite() { v / total } else { 0.0 };
                    let end = start + share * TAU;
                    let wedge = Wedge {
                        start,
                        end,
                        inner,
                        outer: 1.0,
                    };
                    start = end;
                    wedge
                })
                .collect()
        }
    }
}

/// Sample points filling a wedge
fn fill(wedge: &Wedge) -> Vec<(f64, f64)> {
    let span = wedge.end - wedge.start;
    if span <= 0.0 || wedge.outer <= wedge.inner {
        return Vec::new();
    }
    let angle_steps = ((span / TAU) * ANGLE_STEPS_PER_TURN).ceil().max(2.0) as usize;

    let mut coords = Vec::with_capacity((RADIAL_STEPS + 1) * (angle_steps + 1));
    for r_step in 0..=RADIAL_STEPS {
        let r = wedge.inner + (wedge.outer - wedge.inner) * r_step as f64 / RADIAL_STEPS as f64;
        for a_step in 0..=angle_steps {
            let theta = wedge.start + span * a_step as f64 / angle_steps as f64;
            // Clockwise from 12 o'clock
            coords.push((r * theta.sin(), r * theta.cos()));
        }
    }
    coords
}

pub struct RadialChart<'a> {
    chart: &'a SeasonalityChart,
    title: &'a str,
}

impl<'a> RadialChart<'a> {
    pub fn new(chart: &'a SeasonalityChart, title: &'a str) -> Self {
        Self { chart, title }
    }
}

impl Widget for RadialChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 8 || inner.height < 3 {
            return;
        }

        let series = &self.chart.series;
        let show_legend = inner.width >= LEGEND_WIDTH * 2;
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(if show_legend {
                vec![Constraint::Min(10), Constraint::Length(LEGEND_WIDTH)]
            } else {
                vec![Constraint::Min(10)]
            })
            .split(inner);

        let shapes: Vec<(Vec<(f64, f64)>, Color)> = wedges(series.shape, &series.values())
            .iter()
            .zip(&series.points)
            .map(|(wedge, point)| (fill(wedge), to_color(point.color)))
            .collect();

        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([-1.05, 1.05])
            .y_bounds([-1.05, 1.05])
            .paint(|ctx| {
                for (coords, color) in &shapes {
                    ctx.draw(&Points {
                        coords,
                        color: *color,
                    });
                }
            })
            .render(chunks[0], buf);

        if show_legend {
            let legend_area = chunks[1];
            for (i, (line, point)) in self.chart.legend().iter().zip(&series.points).enumerate() {
                let y = legend_area.y + i as u16;
                if y >= legend_area.y + legend_area.height {
                    break;
                }
                buf.set_string(
                    legend_area.x,
                    y,
                    "■",
                    Style::default().fg(to_color(point.color)),
                );
                let text: String = line.chars().take(LEGEND_WIDTH as usize - 2).collect();
                buf.set_string(legend_area.x + 2, y, &text, Style::default().fg(Color::Gray));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pie_angles_follow_share() {
        let w = wedges(ChartShape::Pie, &[1.0, 3.0]);
        assert_eq!(w.len(), 2);
        assert!((w[0].end - TAU * 0.25).abs() < 1e-9);
        assert!((w[1].end - TAU).abs() < 1e-9);
        assert!(w.iter().all(|w| w.outer == 1.0 && w.inner == 0.0));
    }

    #[test]
    fn test_polar_radius_follows_value() {
        let w = wedges(ChartShape::PolarArea, &[2.0, 4.0, 0.0, 1.0]);
        let radii: Vec<f64> = w.iter().map(|w| w.outer).collect();
        assert_eq!(radii, vec![0.5, 1.0, 0.0, 0.25]);
        assert!((w[1].start - TAU / 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_doughnut_has_hole() {
        let w = wedges(ChartShape::Doughnut, &[1.0]);
        assert_eq!(w[0].inner, DOUGHNUT_HOLE);
    }

    #[test]
    fn test_all_zero_pie_is_empty() {
        assert!(wedges(ChartShape::Pie, &[0.0, 0.0]).is_empty());
    }

    #[test]
    fn test_fill_stays_inside_unit_circle() {
        let wedge = Wedge {
            start: 0.0,
            end: TAU / 3.0,
            inner: 0.0,
            outer: 0.8,
        };
        let points = fill(&wedge);
        assert!(!points.is_empty());
        assert!(points.iter().all(|(x, y)| (x * x + y * y).sqrt() <= 0.8 + 1e-9));
    }
}
