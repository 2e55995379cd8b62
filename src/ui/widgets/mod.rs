pub mod metrics;
pub mod radial;
pub mod status;
