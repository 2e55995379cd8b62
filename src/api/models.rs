use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Body returned by the upload and details endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub metrics: Option<Metrics>,
    #[serde(default)]
    pub forecast_data: Vec<ForecastPoint>,
    #[serde(default)]
    pub original_data: Vec<ObservedPoint>,
    /// Component name to raw impact series, e.g. "yearly" -> [...]
    #[serde(default)]
    pub seasonality: Option<BTreeMap<String, Vec<f64>>>,
    #[serde(default)]
    pub changepoints: Vec<String>,
    #[serde(default)]
    pub trend: Vec<f64>,
}

/// Accuracy metrics computed by the server over the historical window
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Metrics {
    #[serde(default)]
    pub mae: Option<f64>,
    #[serde(default)]
    pub rmse: Option<f64>,
    #[serde(default)]
    pub r2: Option<f64>,
    #[serde(default)]
    pub mape: Option<f64>,
}

impl Metrics {
    /// Present metrics in display order (mae, rmse, r2, mape)
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        [
            ("mae", self.mae),
            ("rmse", self.rmse),
            ("r2", self.r2),
            ("mape", self.mape),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect()
    }
}

/// One row of the server's forecast frame
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPoint {
    pub ds: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub yhat: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub yhat_lower: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub yhat_upper: f64,
}

/// One observed (historical) data point
#[derive(Debug, Clone, Deserialize)]
pub struct ObservedPoint {
    #[serde(default)]
    pub ds: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub y: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
    Null(()),
}

/// Accept `12.5`, `"12.5"` or `null`; anything unparsable becomes NaN.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(v) => v,
        NumberOrString::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
        NumberOrString::Null(()) => f64::NAN,
    })
}
