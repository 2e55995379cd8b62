//! Seasonality display pipeline
//!
//! Turns a raw seasonality impact series into a bounded, labelled and colored
//! display series together with the chart shape used to draw it.

pub mod palette;
pub mod ranking;

pub use palette::ChartColor;
pub use ranking::{significance_ranking, top_significant};

use std::fmt;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Number of yearly entries that receive a highlight color
const YEARLY_HIGHLIGHTS: usize = 6;
/// Number of slices kept for monthly and quarterly pies
const PERIOD_SLICES: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SeasonalityComponent {
    Yearly,
    Weekly,
    Monthly,
    Quarterly,
}

impl SeasonalityComponent {
    /// Render order
    pub const ALL: [SeasonalityComponent; 4] = [
        SeasonalityComponent::Yearly,
        SeasonalityComponent::Weekly,
        SeasonalityComponent::Monthly,
        SeasonalityComponent::Quarterly,
    ];

    /// Key used by the server's `seasonality` mapping
    pub fn name(self) -> &'static str {
        match self {
            SeasonalityComponent::Yearly => "yearly",
            SeasonalityComponent::Weekly => "weekly",
            SeasonalityComponent::Monthly => "monthly",
            SeasonalityComponent::Quarterly => "quarterly",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    pub fn title(self) -> String {
        let name = self.name();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => format!("{}{} Pattern", first.to_uppercase(), chars.as_str()),
            None => String::new(),
        }
    }

    /// Maximum number of displayed entries
    pub fn cap(self) -> usize {
        match self {
            SeasonalityComponent::Yearly => 12,
            SeasonalityComponent::Weekly => 7,
            SeasonalityComponent::Monthly | SeasonalityComponent::Quarterly => PERIOD_SLICES,
        }
    }

    pub fn shape(self) -> ChartShape {
        match self {
            SeasonalityComponent::Yearly => ChartShape::Bar,
            SeasonalityComponent::Weekly => ChartShape::PolarArea,
            SeasonalityComponent::Monthly | SeasonalityComponent::Quarterly => ChartShape::Pie,
        }
    }
}

impl fmt::Display for SeasonalityComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartShape {
    Bar,
    PolarArea,
    Pie,
    Doughnut,
}

impl ChartShape {
    /// Shapes whose values must be non-negative magnitudes
    pub fn is_radial(self) -> bool {
        matches!(
            self,
            ChartShape::PolarArea | ChartShape::Pie | ChartShape::Doughnut
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            ChartShape::Bar => "bar",
            ChartShape::PolarArea => "polarArea",
            ChartShape::Pie => "pie",
            ChartShape::Doughnut => "doughnut",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayPoint {
    pub label: String,
    pub value: f64,
    pub color: ChartColor,
}

/// Ordered, bounded set of points ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySeries {
    pub component: SeasonalityComponent,
    pub shape: ChartShape,
    pub points: Vec<DisplayPoint>,
}

impl DisplaySeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn colors(&self) -> Vec<ChartColor> {
        self.points.iter().map(|p| p.color).collect()
    }
}

/// Absolute values for radial shapes, untouched otherwise
pub fn coerce_for_shape(shape: ChartShape, values: &[f64]) -> Vec<f64> {
    if shape.is_radial() {
        values.iter().map(|v| v.abs()).collect()
    } else {
        values.to_vec()
    }
}

/// Tooltip/legend text for one entry
pub fn format_tooltip(label: &str, value: f64) -> String {
    format!("{}: {:.2}", label, value)
}

/// Build the display series for one component.
///
/// Returns `None` for an empty series; the caller leaves that chart alone.
pub fn build_display_series(component: SeasonalityComponent, raw: &[f64]) -> Option<DisplaySeries> {
    if raw.is_empty() {
        return None;
    }

    let shape = component.shape();
    let (labels, values, colors) = match component {
        SeasonalityComponent::Yearly => yearly(raw),
        SeasonalityComponent::Weekly => weekly(raw),
        SeasonalityComponent::Monthly | SeasonalityComponent::Quarterly => periods(raw),
    };
    let values = coerce_for_shape(shape, &values);

    let points = labels
        .into_iter()
        .zip(values)
        .zip(colors)
        .map(|((label, value), color)| DisplayPoint {
            label,
            value,
            color,
        })
        .collect();

    Some(DisplaySeries {
        component,
        shape,
        points,
    })
}

type Columns = (Vec<String>, Vec<f64>, Vec<ChartColor>);

/// First twelve entries in calendar order; only the six largest are highlighted
fn yearly(raw: &[f64]) -> Columns {
    let shown = &raw[..raw.len().min(MONTH_LABELS.len())];
    let significant = top_significant(shown, YEARLY_HIGHLIGHTS);

    let colors = shown
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            if !significant.contains(&i) {
                palette::MUTED
            } else if v >= 0.0 {
                palette::POSITIVE
            } else {
                palette::NEGATIVE
            }
        })
        .collect();

    let labels = MONTH_LABELS[..shown.len()]
        .iter()
        .map(|l| l.to_string())
        .collect();

    (labels, shown.to_vec(), colors)
}

/// First seven entries Mon..Sun; lightness follows normalized magnitude
fn weekly(raw: &[f64]) -> Columns {
    let shown = &raw[..raw.len().min(WEEKDAY_LABELS.len())];
    let max = shown
        .iter()
        .map(|v| v.abs())
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);

    let colors = shown
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let norm = if max > 0.0 && v.is_finite() {
                v.abs() / max
            } else {
                0.0
            };
            // Stronger impact reads darker
            ChartColor::wheel(i, shown.len(), 70.0 - 25.0 * norm)
        })
        .collect();

    let labels = WEEKDAY_LABELS[..shown.len()]
        .iter()
        .map(|l| l.to_string())
        .collect();

    (labels, shown.to_vec(), colors)
}

/// Top slices by magnitude, labelled with their 1-based position
fn periods(raw: &[f64]) -> Columns {
    let selected = top_significant(raw, PERIOD_SLICES);
    let n = selected.len();

    let labels = selected.iter().map(|i| format!("Period {}", i + 1)).collect();
    let values = selected.iter().map(|&i| raw[i].abs()).collect();
    let colors = (0..n).map(|i| ChartColor::wheel(i, n, 60.0)).collect();

    (labels, values, colors)
}
