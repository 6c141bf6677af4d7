//! Caller-side helper for the live position endpoint.
//!
//! Any failure, from transport to an unexpected payload shape, comes back as
//! `None`: callers treat it as "no live data", never as an error to surface.

use reqwest::{Client, Url};
use tracing::warn;

use crate::models::{LiveEnvelope, LivePosition};

#[derive(Clone, Debug)]
pub struct LiveFlightClient {
    client: Client,
    endpoint: String,
}

impl LiveFlightClient {
    /// `endpoint` is the full URL of the live position route,
    /// e.g. `https://skytracker.example/opensky-search`.
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub async fn live_position(&self, icao24: &str) -> Option<LivePosition> {
        match self.fetch(icao24).await {
            Ok(position) => position,
            Err(e) => {
                warn!(icao24, error = %e, "live position lookup failed");
                None
            }
        }
    }

    async fn fetch(&self, icao24: &str) -> Result<Option<LivePosition>, String> {
        let url = Url::parse_with_params(&self.endpoint, [("icao24", icao24)])
            .map_err(|e| e.to_string())?;
        let response = self.client.get(url).send().await.map_err(|e| e.to_string())?;
        let status = response.status();
        let envelope: LiveEnvelope = response.json().await.map_err(|e| e.to_string())?;

        if !status.is_success() {
            return Err(envelope
                .error
                .unwrap_or_else(|| format!("HTTP error: {}", status)));
        }

        Ok(match envelope {
            LiveEnvelope {
                success: true,
                data: Some(state),
                ..
            } => Some(LivePosition::from(state)),
            _ => None,
        })
    }
}
