use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DownloaderError {
    #[error("Invalid argument: {0}")]
    ArgumentError(String),

    #[error("Request failed for {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Could not build HTTP client: {0}")]
    ClientError(#[source] reqwest::Error),

    #[error("HTTP error: {status} for URL: {url}")]
    HttpStatusError {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Invalid gzip data: {0}")]
    FormatError(#[source] std::io::Error),

    #[error("IO error on {}: {source}", path.display())]
    FileSystemError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Background task failed: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

impl DownloaderError {
    pub fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DownloaderError::FileSystemError {
            path: path.into(),
            source,
        }
    }

    /// True for failures that came from talking to the archive.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            DownloaderError::NetworkError { .. } | DownloaderError::HttpStatusError { .. }
        )
    }
}
