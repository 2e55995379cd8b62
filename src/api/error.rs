use std::path::PathBuf;
use thiserror::Error;

/// Failures the dashboard distinguishes when talking to the forecast server.
///
/// The `Display` text of each variant is what ends up in the alert banner.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Please select a file")]
    NoFile,

    #[error("Could not read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Connection refused, reset, DNS failure and the like
    #[error("Error processing file")]
    Transport(#[source] reqwest::Error),

    #[error("Server response was not JSON")]
    NotJson { content_type: Option<String> },

    #[error("Invalid JSON in server response: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// Message taken verbatim from the server's `error` field
    #[error("{0}")]
    Server(String),

    #[error("Could not save download: {0}")]
    Io(#[source] std::io::Error),
}

impl From<reqwest::Error> for UploadError {
    fn from(err: reqwest::Error) -> Self {
        UploadError::Transport(err)
    }
}
