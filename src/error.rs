//! Error types for the gateway and the offline cache manager.

use axum::http::StatusCode;
use thiserror::Error;

/// Failure of a single upstream API call.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("invalid upstream URL: {0}")]
    InvalidUrl(String),

    #[error("upstream API error: {0}")]
    Status(StatusCode),

    // reqwest errors carry the request URL, which holds the API key;
    // both variants must be built from `without_url()`
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("invalid JSON from upstream: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Everything a proxy endpoint can answer with other than success.
#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Missing query parameter '{0}'")]
    MissingParameter(&'static str),

    #[error("API key not configured")]
    MissingApiKey,

    #[error("No live data for aircraft {0}")]
    NoStateVector(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl ProxyError {
    /// HTTP status the endpoint answers with for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::MissingParameter(_) => StatusCode::BAD_REQUEST,
            Self::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NoStateVector(_) => StatusCode::NOT_FOUND,
            // upstream 404s are never passed through
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Failures inside the offline cache manager. These are logged and
/// swallowed by the lifecycle handlers; only a fetch with no fallback
/// surfaces one to the caller.
#[derive(Error, Debug)]
pub enum OfflineError {
    #[error("cache storage error: {0}")]
    Storage(String),

    #[error("network fetch failed for {url}: {message}")]
    Network { url: String, message: String },

    #[error("asset {url} answered with status {status}")]
    BadStatus { url: String, status: StatusCode },

    #[error("invalid asset URL '{0}'")]
    InvalidUrl(String),

    #[error("runtime error: {0}")]
    Runtime(String),

    #[error("notification error: {0}")]
    Notification(String),
}

impl OfflineError {
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    #[must_use]
    pub fn network(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            url: url.into(),
            message: message.into(),
        }
    }
}
