//! Chart specifications, render surfaces and the live-chart registry

pub mod forecast;
pub mod registry;

pub use forecast::{forecast_chart, LineChart, LineDataset};
pub use registry::{render_seasonality, ChartRegistry};

use crate::seasonality::{
    build_display_series, format_tooltip, DisplaySeries, SeasonalityComponent,
};
use std::fmt;

/// Logical render target, one per chart identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChartTarget {
    Forecast,
    Seasonality(SeasonalityComponent),
}

impl ChartTarget {
    pub const ALL: [ChartTarget; 5] = [
        ChartTarget::Forecast,
        ChartTarget::Seasonality(SeasonalityComponent::Yearly),
        ChartTarget::Seasonality(SeasonalityComponent::Weekly),
        ChartTarget::Seasonality(SeasonalityComponent::Monthly),
        ChartTarget::Seasonality(SeasonalityComponent::Quarterly),
    ];

    /// Stable identifier of the surface (`forecastChart`, `yearlyChart`, ...)
    pub fn id(self) -> &'static str {
        match self {
            ChartTarget::Forecast => "forecastChart",
            ChartTarget::Seasonality(SeasonalityComponent::Yearly) => "yearlyChart",
            ChartTarget::Seasonality(SeasonalityComponent::Weekly) => "weeklyChart",
            ChartTarget::Seasonality(SeasonalityComponent::Monthly) => "monthlyChart",
            ChartTarget::Seasonality(SeasonalityComponent::Quarterly) => "quarterlyChart",
        }
    }
}

impl fmt::Display for ChartTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Formats one value for a tooltip or legend entry
pub type TooltipFormatter = fn(&str, f64) -> String;

#[derive(Debug, Clone, PartialEq)]
pub struct AxisSpec {
    pub title: String,
    pub begin_at_zero: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalityChart {
    pub series: DisplaySeries,
    pub tooltip: TooltipFormatter,
    /// Value axis, only for bar charts
    pub value_axis: Option<AxisSpec>,
}

impl SeasonalityChart {
    pub fn new(series: DisplaySeries) -> Self {
        let value_axis = (!series.shape.is_radial()).then(|| AxisSpec {
            title: "Impact".to_string(),
            begin_at_zero: false,
        });
        Self {
            series,
            tooltip: format_tooltip,
            value_axis,
        }
    }

    /// Legend lines in display order
    pub fn legend(&self) -> Vec<String> {
        self.series
            .points
            .iter()
            .map(|p| (self.tooltip)(&p.label, p.value))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartBody {
    Line(LineChart),
    Seasonality(SeasonalityChart),
}

/// Everything a surface needs to draw one chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub body: ChartBody,
}

impl ChartSpec {
    pub fn seasonality(component: SeasonalityComponent, raw: &[f64]) -> Option<Self> {
        build_display_series(component, raw).map(|series| ChartSpec {
            title: component.title(),
            body: ChartBody::Seasonality(SeasonalityChart::new(series)),
        })
    }

    pub fn kind(&self) -> &'static str {
        match &self.body {
            ChartBody::Line(_) => "line",
            ChartBody::Seasonality(chart) => chart.series.shape.name(),
        }
    }
}

/// Handle to a live chart on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChartId(pub u64);

/// Something a chart can be drawn on.
///
/// A surface owns the charts it creates until they are destroyed; the
/// registry guarantees at most one live chart per target.
pub trait RenderSurface {
    fn create(&mut self, spec: ChartSpec) -> ChartId;
    fn destroy(&mut self, id: ChartId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_ids() {
        let ids: Vec<&str> = ChartTarget::ALL.iter().map(|t| t.id()).collect();
        assert_eq!(
            ids,
            vec![
                "forecastChart",
                "yearlyChart",
                "weeklyChart",
                "monthlyChart",
                "quarterlyChart"
            ]
        );
    }

    #[test]
    fn test_seasonality_spec() {
        let spec = ChartSpec::seasonality(SeasonalityComponent::Yearly, &[1.0, -2.0]).unwrap();
        assert_eq!(spec.title, "Yearly Pattern");
        assert_eq!(spec.kind(), "bar");

        let ChartBody::Seasonality(chart) = &spec.body else {
            panic!("expected seasonality body");
        };
        let axis = chart.value_axis.as_ref().unwrap();
        assert_eq!(axis.title, "Impact");
        assert!(!axis.begin_at_zero);
        assert_eq!(chart.legend(), vec!["Jan: 1.00", "Feb: -2.00"]);
    }

    #[test]
    fn test_radial_spec_has_no_axis() {
        let spec = ChartSpec::seasonality(SeasonalityComponent::Weekly, &[1.0, -2.0]).unwrap();
        assert_eq!(spec.kind(), "polarArea");
        let ChartBody::Seasonality(chart) = &spec.body else {
            panic!("expected seasonality body");
        };
        assert!(chart.value_axis.is_none());
        assert_eq!(chart.legend(), vec!["Mon: 1.00", "Tue: 2.00"]);
    }

    #[test]
    fn test_empty_series_has_no_spec() {
        assert!(ChartSpec::seasonality(SeasonalityComponent::Monthly, &[]).is_none());
    }
}
