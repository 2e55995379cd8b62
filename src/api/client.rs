//! Forecast server HTTP client
//!
//! Uploads a CSV dataset, fetches the stored forecast CSV and the detailed
//! forecast JSON.

use crate::api::error::UploadError;
use crate::api::models::ForecastResponse;
use crate::config::ServerConfig;
use crate::dashboard::ForecastService;
use anyhow::Result;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

const JSON_CONTENT_TYPE: &str = "application/json";
const FALLBACK_ERROR: &str = "An error occurred";

/// Forecast server client
#[derive(Debug, Clone)]
pub struct ForecastClient {
    client: Client,
    upload_url: String,
    download_url: String,
    details_url: String,
}

/// Minimal shape of the server's error bodies
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl ForecastClient {
    /// Create a new client from the server section of the config
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            upload_url: config.upload_url(),
            download_url: config.download_url(),
            details_url: config.details_url(),
        })
    }

    /// POST the file as the single `file` field of a multipart body
    pub async fn upload(&self, path: &Path) -> Result<ForecastResponse, UploadError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| UploadError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.csv".to_string());

        info!(
            "Uploading {} ({} bytes) to {}",
            file_name,
            bytes.len(),
            self.upload_url
        );

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("text/csv")?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;

        read_forecast(response).await
    }

    /// Fetch the forecast details saved by the last successful upload
    pub async fn forecast_details(&self) -> Result<ForecastResponse, UploadError> {
        info!("Fetching forecast details from {}", self.details_url);
        let response = self.client.get(&self.details_url).send().await?;
        read_forecast(response).await
    }

    /// Download the forecast CSV to `dest`, returning the number of bytes written
    pub async fn download_forecast(&self, dest: &Path) -> Result<u64, UploadError> {
        info!("Downloading forecast CSV from {}", self.download_url);
        let response = self.client.get(&self.download_url).send().await?;

        let status = response.status();
        if is_json(content_type(&response).as_deref()) {
            // The server only answers with JSON on this route when something went wrong
            let body = response.text().await?;
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| FALLBACK_ERROR.to_string());
            warn!("Forecast download refused ({}): {}", status, message);
            return Err(UploadError::Server(message));
        }

        if !status.is_success() {
            return Err(UploadError::Server(format!(
                "Download failed with status {}",
                status
            )));
        }

        let bytes = response.bytes().await?;
        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(UploadError::Io)?;
        }
        tokio::fs::write(dest, &bytes)
            .await
            .map_err(UploadError::Io)?;

        info!("Saved {} bytes to {}", bytes.len(), dest.display());
        Ok(bytes.len() as u64)
    }
}

impl ForecastService for ForecastClient {
    async fn upload(&self, path: &Path) -> Result<ForecastResponse, UploadError> {
        ForecastClient::upload(self, path).await
    }
}

fn content_type(response: &Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn is_json(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.contains(JSON_CONTENT_TYPE))
}

/// Decode a forecast body, applying the content-type and status rules
async fn read_forecast(response: Response) -> Result<ForecastResponse, UploadError> {
    let status = response.status();
    let content_type = content_type(&response);

    if !is_json(content_type.as_deref()) {
        warn!(
            "Server answered {} with content-type {:?}",
            status, content_type
        );
        return Err(UploadError::NotJson { content_type });
    }

    let body = response.text().await?;
    debug!(
        "Forecast response: {} - {}",
        status,
        body.chars().take(200).collect::<String>()
    );

    let data: ForecastResponse = serde_json::from_str(&body).map_err(UploadError::InvalidJson)?;

    if !status.is_success() {
        let message = data.error.unwrap_or_else(|| FALLBACK_ERROR.to_string());
        warn!("Forecast request failed with status {}: {}", status, message);
        return Err(UploadError::Server(message));
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_content_type_detection() {
        assert!(is_json(Some("application/json")));
        assert!(is_json(Some("application/json; charset=utf-8")));
        assert!(!is_json(Some("text/html; charset=utf-8")));
        assert!(!is_json(None));
    }

    #[test]
    fn test_client_uses_configured_urls() {
        let config = ServerConfig {
            base_url: "http://localhost:9000/".to_string(),
            ..ServerConfig::default()
        };
        let client = ForecastClient::new(&config).unwrap();

        assert_eq!(client.upload_url, "http://localhost:9000/upload");
        assert_eq!(client.download_url, "http://localhost:9000/download_forecast");
        assert_eq!(client.details_url, "http://localhost:9000/forecast_details");
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let client = ForecastClient::new(&ServerConfig::default()).unwrap();
        let err = client
            .upload(Path::new("/definitely/not/here.csv"))
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::ReadFile { .. }));
    }
}
