//! Cache-first offline manager.
//!
//! Lifecycle: `install` fills the current generation from the pre-cache
//! list, `activate` drops every other generation, then `handle_fetch`
//! serves intercepted requests for the rest of the worker's life. No
//! failing step is fatal: errors are logged and the manager degrades to
//! network or cache.

use std::sync::Arc;

use axum::http::Method;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::host::{Fetcher, Notifier, WorkerRuntime};
use super::notification::{PushPayload, VIEW_ACTION, build_notification};
use super::request::{FetchRequest, StoredResponse};
use super::scope::should_intercept;
use super::storage::{CacheGeneration, CacheStorage};
use crate::config::OfflineConfig;
use crate::error::OfflineError;
use crate::metrics::{OFFLINE_CACHE_HITS, OFFLINE_CACHE_MISSES, OFFLINE_CACHE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Installing,
    Installed,
    Activated,
}

/// Outcome of an install: which pre-cache assets made it.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InstallReport {
    pub cached: Vec<String>,
    pub failed: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// Not ours: the browser handles it natively.
    Bypass,
    /// Served from the current generation, network untouched.
    Cache(StoredResponse),
    /// Fetched from the network.
    Network(StoredResponse),
    /// Network failed; cached root document served to a navigation.
    Fallback(StoredResponse),
}

impl FetchOutcome {
    pub fn response(&self) -> Option<&StoredResponse> {
        match self {
            Self::Bypass => None,
            Self::Cache(r) | Self::Network(r) | Self::Fallback(r) => Some(r),
        }
    }
}

/// Messages a page can post to the worker.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum WorkerMessage {
    #[serde(rename = "SKIP_WAITING", alias = "skip-waiting")]
    SkipWaiting,
    #[serde(rename = "GET_VERSION", alias = "get-version")]
    GetVersion,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VersionReply {
    pub version: String,
}

pub struct OfflineCacheManager {
    config: OfflineConfig,
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    runtime: Arc<dyn WorkerRuntime>,
    notifier: Arc<dyn Notifier>,
    phase: LifecyclePhase,
}

impl OfflineCacheManager {
    pub fn new(
        config: OfflineConfig,
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
        runtime: Arc<dyn WorkerRuntime>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            storage,
            fetcher,
            runtime,
            notifier,
            phase: LifecyclePhase::Installing,
        }
    }

    pub fn config(&self) -> &OfflineConfig {
        &self.config
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    pub fn cache_name(&self) -> &str {
        &self.config.cache_name
    }

    async fn current_generation(&self) -> Option<Arc<CacheGeneration>> {
        match self.storage.open(&self.config.cache_name).await {
            Ok(generation) => Some(generation),
            Err(e) => {
                error!(cache = %self.config.cache_name, error = %e, "failed to open cache");
                None
            }
        }
    }

    /// Pre-cache every asset independently, then skip waiting. One failed
    /// asset never stops the others.
    pub async fn install(&mut self) -> InstallReport {
        info!(cache = %self.config.cache_name, "installing offline cache");
        let mut report = InstallReport::default();

        if let Some(generation) = self.current_generation().await {
            for asset in &self.config.precache {
                match self.precache_one(&generation, asset).await {
                    Ok(()) => report.cached.push(asset.clone()),
                    Err(e) => {
                        warn!(asset = %asset, error = %e, "failed to cache asset");
                        report.failed.push(asset.clone());
                    }
                }
            }
            OFFLINE_CACHE_SIZE.set(generation.len() as f64);
        } else {
            report.failed = self.config.precache.clone();
        }

        self.phase = LifecyclePhase::Installed;
        self.runtime.skip_waiting().await;
        report
    }

    async fn precache_one(&self, generation: &CacheGeneration, asset: &str) -> Result<(), OfflineError> {
        let request = FetchRequest::get(self.config.resolve(asset)?);
        let response = self.fetcher.fetch(&request).await?;
        if !response.status.is_success() {
            return Err(OfflineError::BadStatus {
                url: request.url.to_string(),
                status: response.status,
            });
        }
        generation.put(&request, response);
        Ok(())
    }

    /// Delete every generation except the current one, then claim open
    /// pages. Returns the deleted names.
    pub async fn activate(&mut self) -> Vec<String> {
        info!(cache = %self.config.cache_name, "activating offline cache");
        let mut deleted = Vec::new();

        match self.storage.keys().await {
            Ok(names) => {
                for name in names.into_iter().filter(|n| *n != self.config.cache_name) {
                    info!(cache = %name, "deleting stale cache");
                    match self.storage.delete(&name).await {
                        Ok(_) => deleted.push(name),
                        Err(e) => warn!(cache = %name, error = %e, "failed to delete stale cache"),
                    }
                }
            }
            Err(e) => error!(error = %e, "failed to list caches"),
        }

        self.phase = LifecyclePhase::Activated;
        self.runtime.claim_clients().await;
        deleted
    }

    pub fn intercepts(&self, url: &Url) -> bool {
        should_intercept(&self.config.origin, &self.config.allowed_hosts, url)
    }

    /// Cache first, network second. A failed network fetch falls back to
    /// the cached root document for navigations only.
    pub async fn handle_fetch(&self, request: &FetchRequest) -> Result<FetchOutcome, OfflineError> {
        if !self.intercepts(&request.url) {
            return Ok(FetchOutcome::Bypass);
        }

        let generation = self.current_generation().await;

        if let Some(hit) = generation.as_ref().and_then(|g| g.lookup(request)) {
            OFFLINE_CACHE_HITS.inc();
            debug!(url = %request.url, "serving from cache");
            return Ok(FetchOutcome::Cache(hit));
        }
        OFFLINE_CACHE_MISSES.inc();
        debug!(url = %request.url, "fetching from network");

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if request.method == Method::GET && response.is_cacheable() {
                    if let Some(generation) = &generation {
                        generation.put(request, response.clone());
                        OFFLINE_CACHE_SIZE.set(generation.len() as f64);
                    }
                }
                Ok(FetchOutcome::Network(response))
            }
            Err(e) => {
                error!(url = %request.url, error = %e, "fetch failed");
                if request.is_navigation() {
                    if let Some(root) = self.cached_root(generation.as_deref()) {
                        return Ok(FetchOutcome::Fallback(root));
                    }
                }
                Err(e)
            }
        }
    }

    fn cached_root(&self, generation: Option<&CacheGeneration>) -> Option<StoredResponse> {
        let root = self.config.resolve(&self.config.root_document).ok()?;
        generation?.lookup(&FetchRequest::get(root))
    }

    /// Show a notification for a push. Pushes without data are ignored.
    pub async fn handle_push(&self, data: Option<&[u8]>) {
        let Some(data) = data else {
            debug!("push without payload");
            return;
        };
        let payload: PushPayload = match serde_json::from_slice(data) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "push payload is not valid JSON");
                return;
            }
        };
        info!(?payload, "push notification received");

        let (title, options) = build_notification(payload, &self.config.notification);
        if let Err(e) = self.notifier.show_notification(&title, &options).await {
            error!(error = %e, "failed to show notification");
        }
    }

    /// The notification always closes; the view action opens the app.
    pub async fn handle_notification_click(&self, action: Option<&str>) {
        self.notifier.close_notification(&self.config.notification.tag).await;

        if action == Some(VIEW_ACTION) {
            match self.config.resolve(&self.config.root_document) {
                Ok(root) => {
                    if let Err(e) = self.runtime.open_window(&root).await {
                        error!(error = %e, "failed to open window");
                    }
                }
                Err(e) => error!(error = %e, "invalid root document"),
            }
        }
    }

    /// Handle a message posted by a page. `GetVersion` produces the reply
    /// to send back on the message port.
    pub async fn handle_message(&self, data: Value) -> Option<VersionReply> {
        let message: WorkerMessage = match serde_json::from_value(data) {
            Ok(message) => message,
            Err(e) => {
                debug!(error = %e, "ignoring unknown message");
                return None;
            }
        };

        match message {
            WorkerMessage::SkipWaiting => {
                self.runtime.skip_waiting().await;
                None
            }
            WorkerMessage::GetVersion => Some(VersionReply {
                version: self.config.cache_name.clone(),
            }),
        }
    }
}
