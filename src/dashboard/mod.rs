//! Forecast dashboard controller
//!
//! Owns the render surfaces, the live-chart registry, the alert banner and
//! the submit button state. The network call sits behind [`ForecastService`]
//! so the whole flow runs against a stub in tests.

pub mod alert;
pub mod metrics;

pub use alert::{Alert, AlertKind, AlertRegion};
pub use metrics::{format_metric_name, format_metric_value, metric_rows, MetricRow};

use crate::api::{ForecastResponse, UploadError};
use crate::charts::{forecast_chart, render_seasonality, ChartRegistry, ChartTarget, RenderSurface};
use crate::config::UiConfig;
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};

pub const SUCCESS_MESSAGE: &str = "Forecast generated successfully!";
pub const NO_FILE_MESSAGE: &str = "Please select a file";
pub const BUSY_MESSAGE: &str = "A forecast is already being generated, please wait";

/// Anything that can turn an uploaded dataset into a forecast
pub trait ForecastService {
    fn upload(
        &self,
        path: &Path,
    ) -> impl Future<Output = Result<ForecastResponse, UploadError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitState {
    #[default]
    Ready,
    Processing,
}

impl SubmitState {
    pub fn label(self) -> &'static str {
        match self {
            SubmitState::Ready => "Upload and Forecast",
            SubmitState::Processing => "Processing...",
        }
    }

    pub fn is_processing(self) -> bool {
        self == SubmitState::Processing
    }
}

pub struct Dashboard<S: RenderSurface> {
    surfaces: HashMap<ChartTarget, S>,
    registry: ChartRegistry,
    alerts: AlertRegion,
    metrics: Vec<MetricRow>,
    submit: SubmitState,
    download_ready: bool,
    date_format: String,
}

impl<S: RenderSurface> Dashboard<S> {
    /// `surfaces` maps each logical target to the surface it draws on;
    /// targets without a surface are silently skipped when rendering.
    pub fn new(surfaces: HashMap<ChartTarget, S>, ui: &UiConfig) -> Self {
        Self {
            surfaces,
            registry: ChartRegistry::new(),
            alerts: AlertRegion::new(ui.alert_dismiss_after()),
            metrics: Vec::new(),
            submit: SubmitState::Ready,
            download_ready: false,
            date_format: ui.date_format.clone(),
        }
    }

    /// Start a submission.
    ///
    /// Returns the file to upload, or `None` when nothing should be sent.
    /// A second submission while one is pending is rejected.
    pub fn begin_submit(&mut self, file: Option<&Path>) -> Option<PathBuf> {
        if self.submit.is_processing() {
            warn!("Ignoring submit while a forecast request is pending");
            self.alerts.post(AlertKind::Warning, BUSY_MESSAGE);
            return None;
        }

        self.alerts.dismiss();

        // Charts from the previous dataset never outlive a submit attempt
        self.registry.destroy_all(&mut self.surfaces);

        let Some(file) = file else {
            self.alerts.post(AlertKind::Danger, UploadError::NoFile.to_string());
            return None;
        };

        self.submit = SubmitState::Processing;
        info!("Submitting {}", file.display());
        Some(file.to_path_buf())
    }

    /// Finish a submission started with [`begin_submit`](Self::begin_submit)
    pub fn complete_submit(&mut self, outcome: Result<ForecastResponse, UploadError>) {
        self.submit = SubmitState::Ready;

        match outcome {
            Ok(response) => {
                if let Some(message) = &response.error {
                    warn!("Server reported an error: {}", message);
                    self.alerts.post(AlertKind::Danger, message.clone());
                } else {
                    self.show(&response);
                    self.download_ready = true;
                    self.alerts.post(AlertKind::Success, SUCCESS_MESSAGE);
                }
            }
            Err(err) => {
                error!("Forecast request failed: {:?}", err);
                self.alerts.post(AlertKind::Danger, err.to_string());
            }
        }
    }

    /// Run the whole submit flow against `service`
    pub async fn submit<F: ForecastService>(&mut self, service: &F, file: Option<&Path>) {
        let Some(path) = self.begin_submit(file) else {
            return;
        };
        let outcome = service.upload(&path).await;
        self.complete_submit(outcome);
    }

    /// Render the metrics table, forecast chart and seasonality charts
    pub fn show(&mut self, response: &ForecastResponse) {
        if let Some(metrics) = &response.metrics {
            self.metrics = metric_rows(metrics);
        }

        if let Some(surface) = self.surfaces.get_mut(&ChartTarget::Forecast) {
            let spec = forecast_chart(response, &self.date_format);
            self.registry.replace(ChartTarget::Forecast, surface, spec);
        }

        if let Some(seasonality) = &response.seasonality {
            let rendered = render_seasonality(&mut self.registry, &mut self.surfaces, seasonality);
            info!("Rendered {} seasonality charts", rendered.len());
        }
    }

    pub fn tick(&mut self, now: Instant) {
        self.alerts.tick(now);
    }

    pub fn alerts(&self) -> &AlertRegion {
        &self.alerts
    }

    pub fn alerts_mut(&mut self) -> &mut AlertRegion {
        &mut self.alerts
    }

    pub fn metrics(&self) -> &[MetricRow] {
        &self.metrics
    }

    pub fn submit_state(&self) -> SubmitState {
        self.submit
    }

    pub fn download_ready(&self) -> bool {
        self.download_ready
    }

    pub fn surface(&self, target: ChartTarget) -> Option<&S> {
        self.surfaces.get(&target)
    }

    pub fn registry(&self) -> &ChartRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::registry::tests::{all_surfaces, MockSurface};
    use crate::seasonality::SeasonalityComponent;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays canned outcomes and counts calls
    struct StubService {
        calls: AtomicUsize,
        outcomes: Mutex<Vec<Result<ForecastResponse, UploadError>>>,
    }

    impl StubService {
        fn new(outcomes: Vec<Result<ForecastResponse, UploadError>>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                outcomes: Mutex::new(outcomes),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ForecastService for StubService {
        async fn upload(&self, _path: &Path) -> Result<ForecastResponse, UploadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcomes.lock().unwrap().remove(0)
        }
    }

    fn dashboard() -> Dashboard<MockSurface> {
        Dashboard::new(all_surfaces(), &UiConfig::default())
    }

    fn parse(json: &str) -> ForecastResponse {
        serde_json::from_str(json).unwrap()
    }

    fn full_response() -> ForecastResponse {
        parse(
            r#"{
                "metrics": {"mae": 1.234, "rmse": 2.0, "r2": 0.9, "mape": 5.0},
                "forecast_data": [{"ds": "2024-01-01", "yhat": "1", "yhat_lower": "0", "yhat_upper": "2"}],
                "original_data": [{"y": "1"}],
                "seasonality": {
                    "yearly": [5, -10, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0],
                    "weekly": [1, 2, 3, 4, 5, 6, 7],
                    "monthly": [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7],
                    "quarterly": [-1, 1]
                }
            }"#,
        )
    }

    fn live_per_surface(dashboard: &Dashboard<MockSurface>) -> Vec<usize> {
        ChartTarget::ALL
            .iter()
            .map(|t| dashboard.surface(*t).unwrap().live.len())
            .collect()
    }

    #[tokio::test]
    async fn test_no_file_posts_one_danger_alert() {
        let service = StubService::new(vec![]);
        let mut dashboard = dashboard();

        dashboard.submit(&service, None).await;

        assert_eq!(service.calls(), 0);
        assert_eq!(dashboard.alerts().posted_count(), 1);
        let alert = dashboard.alerts().current().unwrap();
        assert_eq!(alert.kind, AlertKind::Danger);
        assert_eq!(alert.message, NO_FILE_MESSAGE);
        assert_eq!(dashboard.submit_state(), SubmitState::Ready);
    }

    #[tokio::test]
    async fn test_no_file_clears_previous_charts() {
        let service = StubService::new(vec![Ok(full_response())]);
        let mut dashboard = dashboard();

        dashboard.submit(&service, Some(Path::new("sales.csv"))).await;
        assert_eq!(dashboard.registry().live_count(), 5);

        dashboard.submit(&service, None).await;

        assert_eq!(service.calls(), 1);
        assert_eq!(dashboard.registry().live_count(), 0);
        assert_eq!(live_per_surface(&dashboard), vec![0, 0, 0, 0, 0]);
        let alert = dashboard.alerts().current().unwrap();
        assert_eq!(alert.kind, AlertKind::Danger);
        assert_eq!(alert.message, UploadError::NoFile.to_string());
    }

    #[tokio::test]
    async fn test_success_renders_everything() {
        let service = StubService::new(vec![Ok(full_response())]);
        let mut dashboard = dashboard();

        dashboard.submit(&service, Some(Path::new("sales.csv"))).await;

        assert_eq!(service.calls(), 1);
        assert_eq!(live_per_surface(&dashboard), vec![1, 1, 1, 1, 1]);
        assert_eq!(dashboard.metrics()[0].value, "1.23");
        assert!(dashboard.download_ready());
        let alert = dashboard.alerts().current().unwrap();
        assert_eq!(alert.kind, AlertKind::Success);
        assert_eq!(alert.message, SUCCESS_MESSAGE);
    }

    #[tokio::test]
    async fn test_response_without_seasonality() {
        let response = parse(
            r#"{
                "metrics": {"mae": 1.234, "rmse": 2.0, "r2": 0.9, "mape": 5.0},
                "forecast_data": [{"ds": "2024-01-01", "yhat": "1", "yhat_lower": "0", "yhat_upper": "2"}],
                "original_data": [{"y": "1"}]
            }"#,
        );
        let service = StubService::new(vec![Ok(response)]);
        let mut dashboard = dashboard();

        dashboard.submit(&service, Some(Path::new("sales.csv"))).await;

        assert_eq!(dashboard.metrics().len(), 4);
        assert_eq!(live_per_surface(&dashboard), vec![1, 0, 0, 0, 0]);
        assert_eq!(dashboard.alerts().current().unwrap().kind, AlertKind::Success);
    }

    #[tokio::test]
    async fn test_resubmit_leaves_one_chart_per_target() {
        let service = StubService::new(vec![Ok(full_response()), Ok(full_response())]);
        let mut dashboard = dashboard();

        dashboard.submit(&service, Some(Path::new("a.csv"))).await;
        dashboard.submit(&service, Some(Path::new("b.csv"))).await;

        assert_eq!(live_per_surface(&dashboard), vec![1, 1, 1, 1, 1]);
        assert_eq!(dashboard.registry().live_count(), 5);
        let yearly = dashboard
            .surface(ChartTarget::Seasonality(SeasonalityComponent::Yearly))
            .unwrap();
        assert_eq!(yearly.created.len(), 2);
        assert_eq!(yearly.destroyed, 1);
    }

    #[tokio::test]
    async fn test_server_error_field_shown_verbatim() {
        let service = StubService::new(vec![Ok(parse(r#"{"error": "Only CSV files are allowed"}"#))]);
        let mut dashboard = dashboard();

        dashboard.submit(&service, Some(Path::new("sales.xlsx"))).await;

        let alert = dashboard.alerts().current().unwrap();
        assert_eq!(alert.kind, AlertKind::Danger);
        assert_eq!(alert.message, "Only CSV files are allowed");
        assert_eq!(dashboard.registry().live_count(), 0);
        assert!(!dashboard.download_ready());
        assert_eq!(dashboard.submit_state(), SubmitState::Ready);
    }

    #[tokio::test]
    async fn test_protocol_errors_restore_ready_state() {
        let service = StubService::new(vec![
            Err(UploadError::NotJson { content_type: Some("text/html".to_string()) }),
            Err(UploadError::Server("Server error: boom".to_string())),
        ]);
        let mut dashboard = dashboard();

        dashboard.submit(&service, Some(Path::new("a.csv"))).await;
        assert_eq!(
            dashboard.alerts().current().unwrap().message,
            "Server response was not JSON"
        );
        assert_eq!(dashboard.submit_state(), SubmitState::Ready);

        dashboard.submit(&service, Some(Path::new("a.csv"))).await;
        assert_eq!(dashboard.alerts().current().unwrap().message, "Server error: boom");
        assert_eq!(service.calls(), 2);
    }

    #[test]
    fn test_second_submit_while_pending_is_rejected() {
        let mut dashboard = dashboard();

        assert!(dashboard.begin_submit(Some(Path::new("a.csv"))).is_some());
        assert_eq!(dashboard.submit_state().label(), "Processing...");
        assert!(dashboard.begin_submit(Some(Path::new("b.csv"))).is_none());

        let alert = dashboard.alerts().current().unwrap();
        assert_eq!(alert.kind, AlertKind::Warning);
        assert_eq!(alert.message, BUSY_MESSAGE);

        dashboard.complete_submit(Ok(full_response()));
        assert_eq!(dashboard.submit_state().label(), "Upload and Forecast");
    }

    #[test]
    fn test_missing_target_is_skipped() {
        let mut surfaces = all_surfaces();
        surfaces.remove(&ChartTarget::Seasonality(SeasonalityComponent::Weekly));
        let mut dashboard = Dashboard::new(surfaces, &UiConfig::default());

        assert!(dashboard.begin_submit(Some(Path::new("a.csv"))).is_some());
        dashboard.complete_submit(Ok(full_response()));

        assert_eq!(dashboard.registry().live_count(), 4);
        assert!(dashboard
            .surface(ChartTarget::Seasonality(SeasonalityComponent::Weekly))
            .is_none());
        assert_eq!(dashboard.alerts().current().unwrap().kind, AlertKind::Success);
    }
}
