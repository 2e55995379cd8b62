use anyhow::{bail, Context, Result};
use chrono::format::{Item, StrftimeItems};
use config::{Config as ConfigLoader, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub download: DownloadConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_upload_path")]
    pub upload_path: String,
    #[serde(default = "default_download_path")]
    pub download_path: String,
    #[serde(default = "default_details_path")]
    pub details_path: String,
    /// Request timeout; unset means the transport default applies
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_upload_path() -> String {
    "/upload".to_string()
}

fn default_download_path() -> String {
    "/download_forecast".to_string()
}

fn default_details_path() -> String {
    "/forecast_details".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            upload_path: default_upload_path(),
            download_path: default_download_path(),
            details_path: default_details_path(),
            timeout_secs: None,
        }
    }
}

impl ServerConfig {
    pub fn upload_url(&self) -> String {
        self.url(&self.upload_path)
    }

    pub fn download_url(&self) -> String {
        self.url(&self.download_path)
    }

    pub fn details_url(&self) -> String {
        self.url(&self.details_path)
    }

    fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_refresh_rate_ms")]
    pub refresh_rate_ms: u64,
    #[serde(default = "default_alert_dismiss_ms")]
    pub alert_dismiss_ms: u64,
    /// chrono format string used for the forecast chart's date axis
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default)]
    pub default_file: String,
}

fn default_refresh_rate_ms() -> u64 {
    100
}

fn default_alert_dismiss_ms() -> u64 {
    5000
}

fn default_date_format() -> String {
    "%-m/%-d/%Y".to_string()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_ms: default_refresh_rate_ms(),
            alert_dismiss_ms: default_alert_dismiss_ms(),
            date_format: default_date_format(),
            default_file: String::new(),
        }
    }
}

impl UiConfig {
    /// Reject date formats chrono cannot render
    pub fn validate(&self) -> Result<()> {
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            bail!("Invalid ui.date_format {:?}", self.date_format);
        }
        Ok(())
    }

    pub fn alert_dismiss_after(&self) -> Duration {
        Duration::from_millis(self.alert_dismiss_ms)
    }

    pub fn refresh_rate(&self) -> Duration {
        Duration::from_millis(self.refresh_rate_ms)
    }

    /// Initial file path for the upload form, if one is configured
    pub fn initial_file(&self) -> Option<PathBuf> {
        let trimmed = self.default_file.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(PathBuf::from(trimmed))
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadConfig {
    #[serde(default = "default_download_dir")]
    pub dir: String,
}

fn default_download_dir() -> String {
    ".".to_string()
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            dir: default_download_dir(),
        }
    }
}

impl DownloadConfig {
    pub fn forecast_path(&self) -> PathBuf {
        PathBuf::from(&self.dir).join("forecast_results.csv")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Log file for the terminal dashboard; stderr is used when unset
    #[serde(default)]
    pub file: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path())
    }

    pub fn load_from(config_path: PathBuf) -> Result<Self> {
        let settings = ConfigLoader::builder()
            .add_source(File::from(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("SALESCAST")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("Failed to build configuration")?;

        let config: Config = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.ui.validate()?;
        Ok(config)
    }

    fn config_path() -> PathBuf {
        // Try local config first, then default
        let local_config = PathBuf::from("config/default.toml");
        if local_config.exists() {
            return local_config;
        }

        // Fallback to executable directory
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let exe_config = exe_dir.join("config/default.toml");
                if exe_config.exists() {
                    return exe_config;
                }
            }
        }

        local_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.server.upload_url(), "http://127.0.0.1:5000/upload");
        assert_eq!(config.ui.alert_dismiss_ms, 5000);
        assert!(config.server.timeout_secs.is_none());
        assert!(config.ui.initial_file().is_none());
    }

    #[test]
    fn test_file_overrides() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("default.toml");
        fs::write(
            &path,
            r#"
[server]
base_url = "http://forecast.local:8080/"
upload_path = "api/upload"

[ui]
default_file = "sales.csv"
"#,
        )
        .unwrap();

        let config = Config::load_from(path).unwrap();
        assert_eq!(
            config.server.upload_url(),
            "http://forecast.local:8080/api/upload"
        );
        assert_eq!(
            config.server.download_url(),
            "http://forecast.local:8080/download_forecast"
        );
        assert_eq!(config.ui.initial_file(), Some(PathBuf::from("sales.csv")));
        assert_eq!(config.ui.refresh_rate(), Duration::from_millis(100));
    }

    #[test]
    fn test_invalid_date_format_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("default.toml");
        fs::write(&path, "[ui]\ndate_format = \"%Y-%\"\n").unwrap();

        let err = Config::load_from(path).unwrap_err();
        assert!(err.to_string().contains("ui.date_format"));

        let ui = UiConfig {
            date_format: "%Q".to_string(),
            ..UiConfig::default()
        };
        assert!(ui.validate().is_err());
        assert!(UiConfig::default().validate().is_ok());
    }
}
