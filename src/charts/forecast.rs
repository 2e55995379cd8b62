//! Sales forecast line chart

use super::{ChartBody, ChartSpec};
use crate::api::ForecastResponse;
use crate::seasonality::palette::{self, ChartColor};
use chrono::NaiveDate;
use std::fmt::Write;

pub const FORECAST_TITLE: &str = "Sales Forecast with Confidence Intervals";

#[derive(Debug, Clone, PartialEq)]
pub struct LineDataset {
    pub label: String,
    pub values: Vec<f64>,
    pub color: ChartColor,
    pub dashed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    /// Date labels for the x axis, one per forecast row
    pub labels: Vec<String>,
    pub datasets: Vec<LineDataset>,
    pub x_title: String,
    pub y_title: String,
    /// Trend changepoint dates, formatted like `labels`
    pub changepoints: Vec<String>,
}

impl LineChart {
    /// Finite (min, max) over every dataset
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.datasets
            .iter()
            .flat_map(|d| d.values.iter().copied())
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Reformat a `YYYY-MM-DD` date; unparsable dates and formats leave it as sent
pub fn format_date(ds: &str, date_format: &str) -> String {
    let day = ds.get(..10).unwrap_or(ds);
    let Ok(date) = NaiveDate::parse_from_str(day, "%Y-%m-%d") else {
        return ds.to_string();
    };

    let mut label = String::new();
    match write!(label, "{}", date.format(date_format)) {
        Ok(()) => label,
        Err(_) => ds.to_string(),
    }
}

/// Build the forecast chart from a successful response
pub fn forecast_chart(response: &ForecastResponse, date_format: &str) -> ChartSpec {
    let labels = response
        .forecast_data
        .iter()
        .map(|p| format_date(&p.ds, date_format))
        .collect();

    let mut datasets = vec![
        LineDataset {
            label: "Actual Sales".to_string(),
            values: response.original_data.iter().map(|p| p.y).collect(),
            color: palette::ACTUAL_LINE,
            dashed: false,
        },
        LineDataset {
            label: "Forecasted Sales".to_string(),
            values: response.forecast_data.iter().map(|p| p.yhat).collect(),
            color: palette::FORECAST_LINE,
            dashed: false,
        },
        LineDataset {
            label: "Upper Bound".to_string(),
            values: response.forecast_data.iter().map(|p| p.yhat_upper).collect(),
            color: palette::BOUND_LINE,
            dashed: true,
        },
        LineDataset {
            label: "Lower Bound".to_string(),
            values: response.forecast_data.iter().map(|p| p.yhat_lower).collect(),
            color: palette::BOUND_LINE,
            dashed: true,
        },
    ];

    if !response.trend.is_empty() {
        datasets.push(LineDataset {
            label: "Trend".to_string(),
            values: response.trend.clone(),
            color: palette::TREND_LINE,
            dashed: false,
        });
    }

    ChartSpec {
        title: FORECAST_TITLE.to_string(),
        body: ChartBody::Line(LineChart {
            labels,
            datasets,
            x_title: "Date".to_string(),
            y_title: "Sales".to_string(),
            changepoints: response
                .changepoints
                .iter()
                .map(|ds| format_date(ds, date_format))
                .collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response() -> ForecastResponse {
        serde_json::from_str(
            r#"{
                "forecast_data": [
                    {"ds": "2024-03-01", "yhat": "10", "yhat_lower": "8", "yhat_upper": "12"},
                    {"ds": "2024-03-02", "yhat": "11", "yhat_lower": "9", "yhat_upper": "14"}
                ],
                "original_data": [{"y": "9.5"}]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_forecast_datasets() {
        let spec = forecast_chart(&response(), "%-m/%-d/%Y");
        assert_eq!(spec.title, FORECAST_TITLE);

        let ChartBody::Line(chart) = spec.body else {
            panic!("expected line chart");
        };
        assert_eq!(chart.labels, vec!["3/1/2024", "3/2/2024"]);

        let names: Vec<&str> = chart.datasets.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(
            names,
            vec!["Actual Sales", "Forecasted Sales", "Upper Bound", "Lower Bound"]
        );
        assert_eq!(chart.datasets[0].values, vec![9.5]);
        assert!(chart.datasets[2].dashed);
        assert_eq!(chart.value_range(), Some((8.0, 14.0)));
    }

    #[test]
    fn test_trend_dataset_when_present() {
        let mut response = response();
        response.trend = vec![10.0, 10.5];

        let ChartBody::Line(chart) = forecast_chart(&response, "%Y-%m-%d").body else {
            panic!("expected line chart");
        };
        assert_eq!(chart.datasets.len(), 5);
        assert_eq!(chart.datasets[4].label, "Trend");
        assert!(chart.changepoints.is_empty());
    }

    #[test]
    fn test_changepoints_use_date_format() {
        let mut response = response();
        response.changepoints = vec!["2024-01-15".to_string(), "2024-02-20 00:00:00".to_string()];

        let ChartBody::Line(chart) = forecast_chart(&response, "%-m/%-d/%Y").body else {
            panic!("expected line chart");
        };
        assert_eq!(chart.changepoints, vec!["1/15/2024", "2/20/2024"]);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-12-05", "%d.%m.%Y"), "05.12.2024");
        assert_eq!(format_date("2024-12-05T00:00:00", "%Y/%m/%d"), "2024/12/05");
        assert_eq!(format_date("last week", "%Y"), "last week");
    }

    #[test]
    fn test_invalid_date_format_keeps_raw_dates() {
        assert_eq!(format_date("2024-03-01", "%Q"), "2024-03-01");

        let ChartBody::Line(chart) = forecast_chart(&response(), "%Y-%").body else {
            panic!("expected line chart");
        };
        assert_eq!(chart.labels, vec!["2024-03-01", "2024-03-02"]);
    }
}
