use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("Request to {url} failed with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Request to {url} failed")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Classifies a reqwest error, keeping timeouts apart from other transport failures
    pub fn from_reqwest(url: &str, timeout: Duration, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                timeout,
            }
        } else {
            FetchError::Network {
                url: url.to_string(),
                source: error,
            }
        }
    }
}

/// Why a payload could not be turned into a manifest
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("could not read file")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON array of releases, found {0}")]
    NotAnArray(&'static str),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Failed to fetch releases")]
    Fetch(#[from] FetchError),

    #[error("Invalid releases data from {origin}")]
    ManifestFormat {
        origin: String,
        #[source]
        reason: FormatError,
    },

    #[error("Invalid version expression \"{0}\"")]
    InvalidVersionExpression(String),

    #[error("Cache directory {path:?} is not usable")]
    CacheDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
