//! Client for the third-party flight-data APIs.
//!
//! One instance per upstream. Each call is a single GET with no retry and no
//! timeout beyond what the hosting platform imposes.

use std::time::Instant;

use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::UpstreamError;
use crate::metrics::{UPSTREAM_FAILURES, UPSTREAM_LATENCY};

/// Query parameter carrying an API key on every call.
#[derive(Clone)]
pub struct ApiKey {
    pub param: &'static str,
    pub value: String,
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKey")
            .field("param", &self.param)
            .field("value", &"<redacted>")
            .finish()
    }
}

/// Clone is cheap - reqwest::Client shares its connection pool.
#[derive(Clone, Debug)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
    key: Option<ApiKey>,
}

impl UpstreamClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            key: None,
        }
    }

    pub fn with_key(mut self, param: &'static str, value: impl Into<String>) -> Self {
        self.key = Some(ApiKey {
            param,
            value: value.into(),
        });
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build `{base}/{path}?key&params`, URL-encoding every value.
    pub fn url_for(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, UpstreamError> {
        let raw = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let key = self.key.as_ref().map(|k| (k.param, k.value.as_str()));
        let pairs = key.into_iter().chain(params.iter().copied());
        Url::parse_with_params(&raw, pairs).map_err(|_| UpstreamError::InvalidUrl(raw))
    }

    /// GET `path` and parse the body as JSON. A non-success status is an
    /// error even when the body is valid JSON.
    pub async fn get_json(&self, path: &str, params: &[(&str, &str)]) -> Result<Value, UpstreamError> {
        let url = self.url_for(path, params)?;
        let start = Instant::now();

        let result = self.fetch(url).await;
        UPSTREAM_LATENCY.observe(start.elapsed().as_secs_f64());

        if let Err(e) = &result {
            UPSTREAM_FAILURES.inc();
            warn!(base = %self.base_url, path, error = %e, "upstream call failed");
        }
        result
    }

    async fn fetch(&self, url: Url) -> Result<Value, UpstreamError> {
        debug!(base = %self.base_url, path = url.path(), "calling upstream");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.without_url()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| UpstreamError::Decode(e.without_url()))
    }
}
