pub mod client;
pub mod error;
pub mod models;

pub use client::ForecastClient;
pub use error::UploadError;
pub use models::{ForecastPoint, ForecastResponse, Metrics, ObservedPoint};
