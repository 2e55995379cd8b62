pub mod api;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod seasonality;
pub mod ui;

pub use config::Config;
