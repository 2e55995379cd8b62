use crate::api::{ForecastClient, ForecastResponse, UploadError};
use crate::charts::ChartTarget;
use crate::config::Config;
use crate::dashboard::{AlertKind, Dashboard};
use crate::seasonality::SeasonalityComponent;
use crate::ui::charts::ChartPanel;
use crate::ui::dialogs::HelpOverlay;
use crate::ui::input::{Action, InputState};
use crate::ui::surface::{panel_surfaces, PanelSurface};
use crate::ui::widgets::{metrics::MetricsWidget, status::StatusWidget};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Frame, Terminal,
};
use std::io;
use std::path::PathBuf;
use std::time::Instant;
use tokio::sync::mpsc;

/// Results of background requests, delivered back to the UI loop
#[derive(Debug)]
enum TaskEvent {
    Upload(Result<ForecastResponse, UploadError>),
    Download {
        dest: PathBuf,
        result: Result<u64, UploadError>,
    },
}

pub struct App {
    config: Config,
    client: ForecastClient,
    dashboard: Dashboard<PanelSurface>,
    input: InputState,
    downloading: bool,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, initial_file: Option<PathBuf>) -> Result<Self> {
        let client = ForecastClient::new(&config.server)?;
        let dashboard = Dashboard::new(panel_surfaces(), &config.ui);
        let input = InputState::new(initial_file.or_else(|| config.ui.initial_file()));

        Ok(Self {
            config,
            client,
            dashboard,
            input,
            downloading: false,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let (event_tx, mut event_rx) = mpsc::channel::<TaskEvent>(8);
        let tick_rate = self.config.ui.refresh_rate();

        let result = async {
            loop {
                // Handle finished requests
                while let Ok(event) = event_rx.try_recv() {
                    self.handle_task_event(event);
                }

                self.dashboard.tick(Instant::now());

                terminal.draw(|f| self.draw(f))?;

                // Handle input
                if event::poll(tick_rate)? {
                    if let Event::Key(key) = event::read()? {
                        if key.kind == KeyEventKind::Press {
                            let action = self.input.handle_key(key.code);
                            self.apply(action, &event_tx);
                        }
                    }
                }

                if self.should_quit {
                    break;
                }
            }
            Ok::<(), anyhow::Error>(())
        }
        .await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn apply(&mut self, action: Action, tx: &mpsc::Sender<TaskEvent>) {
        match action {
            Action::None => {}
            Action::Quit => self.should_quit = true,
            Action::DismissAlert => self.dashboard.alerts_mut().dismiss(),
            Action::Submit => self.start_upload(tx),
            Action::Download => self.start_download(tx),
        }
    }

    fn start_upload(&mut self, tx: &mpsc::Sender<TaskEvent>) {
        let file = self.input.selected_file();
        let Some(path) = self.dashboard.begin_submit(file.as_deref()) else {
            return;
        };

        let client = self.client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = client.upload(&path).await;
            if tx.send(TaskEvent::Upload(outcome)).await.is_err() {
                tracing::debug!("UI closed before upload finished");
            }
        });
    }

    fn start_download(&mut self, tx: &mpsc::Sender<TaskEvent>) {
        if !self.dashboard.download_ready() {
            self.dashboard
                .alerts_mut()
                .post(AlertKind::Info, "Generate a forecast before downloading");
            return;
        }
        if self.downloading {
            return;
        }
        self.downloading = true;

        let dest = self.config.download.forecast_path();
        let client = self.client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = client.download_forecast(&dest).await;
            if tx.send(TaskEvent::Download { dest, result }).await.is_err() {
                tracing::debug!("UI closed before download finished");
            }
        });
    }

    fn handle_task_event(&mut self, event: TaskEvent) {
        match event {
            TaskEvent::Upload(outcome) => self.dashboard.complete_submit(outcome),
            TaskEvent::Download { dest, result } => {
                self.downloading = false;
                let alerts = self.dashboard.alerts_mut();
                match result {
                    Ok(bytes) => alerts.post(
                        AlertKind::Success,
                        format!("Saved forecast to {} ({} bytes)", dest.display(), bytes),
                    ),
                    Err(err) => {
                        tracing::error!("Forecast download failed: {:?}", err);
                        alerts.post(AlertKind::Danger, err.to_string());
                    }
                }
            }
        }
    }

    fn draw(&self, f: &mut Frame) {
        let size = f.area();

        // Main layout: status bar + content
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Percentage(40),
                Constraint::Min(10),
            ])
            .split(size);

        let status = StatusWidget::new(
            &self.input.path,
            self.input.is_editing(),
            self.dashboard.submit_state(),
            self.dashboard.download_ready(),
            self.dashboard.alerts().current(),
        );
        f.render_widget(status, main_chunks[0]);

        // Top: metrics + forecast chart
        let top_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(40), Constraint::Min(20)])
            .split(main_chunks[1]);

        f.render_widget(MetricsWidget::new(self.dashboard.metrics()), top_chunks[0]);
        self.draw_chart(f, top_chunks[1], ChartTarget::Forecast);

        // Bottom: seasonality grid
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(main_chunks[2]);

        let components = SeasonalityComponent::ALL;
        for (row, pair) in rows.iter().zip(components.chunks(2)) {
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(*row);
            for (cell, component) in cells.iter().zip(pair) {
                self.draw_chart(f, *cell, ChartTarget::Seasonality(*component));
            }
        }

        if self.input.is_help() {
            f.render_widget(HelpOverlay::new(), size);
        }
    }

    fn draw_chart(&self, f: &mut Frame, area: Rect, target: ChartTarget) {
        let spec = self.dashboard.surface(target).and_then(|s| s.chart());
        let placeholder = match target {
            ChartTarget::Forecast => "Sales Forecast".to_string(),
            ChartTarget::Seasonality(component) => component.title(),
        };
        f.render_widget(ChartPanel::new(spec, &placeholder), area);
    }
}
