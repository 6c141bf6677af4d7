//! Collaborators the offline cache manager needs from its host: the
//! network, the worker runtime and the notification subsystem.

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use super::notification::NotificationOptions;
use super::request::{FetchRequest, ResponseKind, StoredResponse};
use crate::error::OfflineError;

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Perform the request. Any HTTP status is a success; only transport
    /// failures are errors.
    async fn fetch(&self, request: &FetchRequest) -> Result<StoredResponse, OfflineError>;
}

#[async_trait]
pub trait WorkerRuntime: Send + Sync {
    /// Activate this worker without waiting for old clients to close.
    async fn skip_waiting(&self);

    /// Take control of already open pages.
    async fn claim_clients(&self);

    /// Open or focus a window on `url`.
    async fn open_window(&self, url: &Url) -> Result<(), OfflineError>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn show_notification(&self, title: &str, options: &NotificationOptions) -> Result<(), OfflineError>;

    async fn close_notification(&self, tag: &str);
}

/// Network access through reqwest, for hosts outside a browser.
/// Responses from the worker's own origin are `Basic`, everything else
/// `Cors`.
#[derive(Clone, Debug)]
pub struct ReqwestFetcher {
    client: Client,
    origin: Url,
}

impl ReqwestFetcher {
    pub fn new(client: Client, origin: Url) -> Self {
        Self { client, origin }
    }
}

#[async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<StoredResponse, OfflineError> {
        debug!(method = %request.method, url = %request.url, "network fetch");

        let to_offline = |e: reqwest::Error| OfflineError::network(request.url.as_str(), e.to_string());
        let response = self
            .client
            .request(request.method.clone(), request.url.clone())
            .send()
            .await
            .map_err(to_offline)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(to_offline)?;
        let kind = if request.url.origin() == self.origin.origin() {
            ResponseKind::Basic
        } else {
            ResponseKind::Cors
        };

        Ok(StoredResponse {
            status,
            headers,
            body,
            kind,
        })
    }
}
