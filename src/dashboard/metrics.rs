//! Display names and formatting for forecast accuracy metrics

use crate::api::Metrics;

#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub name: String,
    pub value: String,
}

pub fn format_metric_name(key: &str) -> String {
    match key {
        "mae" => "Mean Absolute Error".to_string(),
        "rmse" => "Root Mean Square Error".to_string(),
        "r2" => "R² Score".to_string(),
        "mape" => "Mean Absolute % Error".to_string(),
        other => other.to_string(),
    }
}

/// r2 is a ratio shown as a percentage; mape is already a percentage
pub fn format_metric_value(key: &str, value: f64) -> String {
    match key {
        "r2" => format!("{:.2}%", value * 100.0),
        "mape" => format!("{:.2}%", value),
        _ => format!("{:.2}", value),
    }
}

pub fn metric_rows(metrics: &Metrics) -> Vec<MetricRow> {
    metrics
        .entries()
        .into_iter()
        .map(|(key, value)| MetricRow {
            name: format_metric_name(key),
            value: format_metric_value(key, value),
        })
        .collect()
}
