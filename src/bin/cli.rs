//! Headless forecast client
//!
//! Runs the dashboard flow without a terminal UI and prints every chart.
//! Usage:
//!   cargo run --bin salescast-cli -- upload data/sales.csv
//!   cargo run --bin salescast-cli -- download --out forecast_results.csv
//!   cargo run --bin salescast-cli -- details

use anyhow::Result;
use clap::{Parser, Subcommand};
use salescast::api::ForecastClient;
use salescast::charts::{ChartBody, ChartId, ChartSpec, ChartTarget, LineChart, RenderSurface, SeasonalityChart};
use salescast::config::Config;
use salescast::dashboard::{AlertKind, Dashboard, MetricRow};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "salescast-cli")]
#[command(about = "Upload sales data and inspect the forecast from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload a CSV dataset and print the resulting forecast
    Upload {
        /// CSV file with the sales history
        file: PathBuf,
    },

    /// Save the last generated forecast as CSV
    Download {
        /// Destination file
        #[arg(short, long, default_value = "forecast_results.csv")]
        out: PathBuf,
    },

    /// Print the last generated forecast
    Details,
}

/// Surface that prints each chart as soon as it is created
struct ConsoleSurface {
    target: ChartTarget,
    next_id: u64,
}

impl ConsoleSurface {
    fn new(target: ChartTarget) -> Self {
        Self { target, next_id: 0 }
    }
}

impl RenderSurface for ConsoleSurface {
    fn create(&mut self, spec: ChartSpec) -> ChartId {
        self.next_id += 1;
        print_chart(self.target, &spec);
        ChartId(self.next_id)
    }

    fn destroy(&mut self, id: ChartId) {
        tracing::debug!("Released chart {:?} on {}", id, self.target);
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("salescast=warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let client = ForecastClient::new(&config.server)?;

    match cli.command {
        Commands::Upload { file } => {
            let mut dashboard = console_dashboard(&config);
            dashboard.submit(&client, Some(&file)).await;
            Ok(finish(&dashboard))
        }

        Commands::Download { out } => match client.download_forecast(&out).await {
            Ok(bytes) => {
                println!("Saved forecast to {} ({} bytes)", out.display(), bytes);
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => {
                eprintln!("\x1b[31m{}\x1b[0m", err);
                Ok(ExitCode::FAILURE)
            }
        },

        Commands::Details => {
            let mut dashboard = console_dashboard(&config);
            match client.forecast_details().await {
                Ok(response) => match &response.error {
                    Some(message) => dashboard.alerts_mut().post(AlertKind::Danger, message.clone()),
                    None => dashboard.show(&response),
                },
                Err(err) => dashboard.alerts_mut().post(AlertKind::Danger, err.to_string()),
            }
            Ok(finish(&dashboard))
        }
    }
}

fn console_dashboard(config: &Config) -> Dashboard<ConsoleSurface> {
    let surfaces: HashMap<_, _> = ChartTarget::ALL
        .into_iter()
        .map(|target| (target, ConsoleSurface::new(target)))
        .collect();
    Dashboard::new(surfaces, &config.ui)
}

/// Print metrics and the final alert; failure when the alert is a danger
fn finish(dashboard: &Dashboard<ConsoleSurface>) -> ExitCode {
    print_metrics(dashboard.metrics());

    match dashboard.alerts().current() {
        Some(alert) => {
            let color = match alert.kind {
                AlertKind::Success => "32",
                AlertKind::Info => "36",
                AlertKind::Warning => "33",
                AlertKind::Danger => "31",
            };
            println!("\x1b[{}m[{}] {}\x1b[0m", color, alert.kind.name(), alert.message);
            if alert.kind == AlertKind::Danger {
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        None => ExitCode::SUCCESS,
    }
}

fn print_metrics(rows: &[MetricRow]) {
    if rows.is_empty() {
        return;
    }
    println!();
    println!("\x1b[1;36m{}\x1b[0m", "═".repeat(45));
    println!("\x1b[1;36m              MODEL PERFORMANCE\x1b[0m");
    println!("\x1b[1;36m{}\x1b[0m", "═".repeat(45));
    for row in rows {
        println!("{:<30} {:>14}", row.name, row.value);
    }
    println!();
}

fn print_chart(target: ChartTarget, spec: &ChartSpec) {
    println!();
    println!("\x1b[1m{}\x1b[0m  ({}, {})", spec.title, spec.kind(), target);
    println!("{}", "─".repeat(45));
    match &spec.body {
        ChartBody::Line(chart) => print_line_chart(chart),
        ChartBody::Seasonality(chart) => print_seasonality_chart(chart),
    }
}

fn print_line_chart(chart: &LineChart) {
    println!("{} points", chart.labels.len());
    for dataset in &chart.datasets {
        let finite: Vec<f64> = dataset.values.iter().copied().filter(|v| v.is_finite()).collect();
        let (first, last) = match (finite.first(), finite.last()) {
            (Some(first), Some(last)) => (format!("{:.2}", first), format!("{:.2}", last)),
            _ => ("-".to_string(), "-".to_string()),
        };
        println!(
            "  {:<18} {:>12} → {:<12} {}",
            dataset.label,
            first,
            last,
            if dataset.dashed { "(dashed)" } else { "" }
        );
    }
    if !chart.changepoints.is_empty() {
        println!("  Changepoints: {}", chart.changepoints.join(", "));
    }
}

fn print_seasonality_chart(chart: &SeasonalityChart) {
    for (point, legend) in chart.series.points.iter().zip(chart.legend()) {
        println!("  {:<24} {}", legend, point.color);
    }
}
