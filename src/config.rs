use clap::Parser;
use reqwest::Url;

use crate::error::OfflineError;

/// Upstream base URL for scheduled-flight lookups
pub const AVIATIONSTACK_BASE_URL: &str = "http://api.aviationstack.com/v1";

/// Upstream base URL for live state vectors
pub const OPENSKY_BASE_URL: &str = "https://opensky-network.org/api";

/// Name of the current cache generation, bumped by hand on release
pub const CACHE_NAME: &str = "skytracker-v1.0.0";

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "skytracker-gateway")]
#[command(about = "Flight data proxy for the SkyTracker web app")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // AviationStack API base URL
    #[arg(long, default_value = AVIATIONSTACK_BASE_URL)]
    pub aviationstack_url: String,

    // OpenSky API base URL
    #[arg(long, default_value = OPENSKY_BASE_URL)]
    pub opensky_url: String,

    // AviationStack access key. Left unset, flight searches answer 500
    #[arg(long, env = "AVIATIONSTACK_API_KEY", hide_env_values = true)]
    pub aviationstack_key: Option<String>,

    // Default log filter, RUST_LOG wins when set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Settings of the offline cache manager.
#[derive(Debug, Clone)]
pub struct OfflineConfig {
    /// Name of the current cache generation.
    pub cache_name: String,
    /// Origin the worker is served from.
    pub origin: Url,
    /// Third-party hosts whose requests are intercepted too.
    pub allowed_hosts: Vec<String>,
    /// Assets cached on install, relative to `origin` or absolute.
    pub precache: Vec<String>,
    /// Document served to navigations when the network is gone.
    pub root_document: String,
    /// Notification settings for push events.
    pub notification: NotificationConfig,
}

/// Defaults applied to push notifications.
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub default_title: String,
    pub default_body: String,
    pub icon: String,
    pub badge: String,
    pub tag: String,
    pub vibrate: Vec<u32>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            default_title: "SkyTracker".to_string(),
            default_body: "Flight update available".to_string(),
            icon: "/icon-192x192.png".to_string(),
            badge: "/icon-72x72.png".to_string(),
            tag: "flight-update".to_string(),
            vibrate: vec![200, 100, 200],
        }
    }
}

impl OfflineConfig {
    /// Configuration for a worker served from `origin`, with the stock
    /// pre-cache list and CDN allow-list.
    pub fn for_origin(origin: Url) -> Self {
        Self {
            cache_name: CACHE_NAME.to_string(),
            origin,
            allowed_hosts: vec!["cdnjs.cloudflare.com".to_string()],
            precache: vec![
                "./".to_string(),
                "./index.html".to_string(),
                "./manifest.json".to_string(),
                "https://cdnjs.cloudflare.com/ajax/libs/lucide/0.263.1/umd/lucide.js".to_string(),
            ],
            root_document: "/".to_string(),
            notification: NotificationConfig::default(),
        }
    }

    pub fn with_cache_name(mut self, name: impl Into<String>) -> Self {
        self.cache_name = name.into();
        self
    }

    /// Resolve an asset path against the origin.
    pub fn resolve(&self, path: &str) -> Result<Url, OfflineError> {
        self.origin
            .join(path)
            .map_err(|_| OfflineError::InvalidUrl(path.to_string()))
    }
}
