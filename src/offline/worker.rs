use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::manager::{FetchOutcome, InstallReport, OfflineCacheManager, VersionReply};
use super::request::FetchRequest;
use crate::error::OfflineError;

// Events the host delivers to the worker
pub enum WorkerEvent {
    Install {
        done: oneshot::Sender<InstallReport>,
    },
    Activate {
        done: oneshot::Sender<Vec<String>>,
    },
    Fetch {
        request: FetchRequest,
        respond_to: oneshot::Sender<Result<FetchOutcome, OfflineError>>,
    },
    Push {
        data: Option<Vec<u8>>,
    },
    NotificationClick {
        action: Option<String>,
    },
    Message {
        data: Value,
        reply: Option<oneshot::Sender<VersionReply>>, // message port, if the page sent one
    },
}

// Event loop - one event runs to completion before the next is taken.
// Ends when every handle is dropped and hands the manager back.
pub async fn event_loop(
    mut rx: mpsc::Receiver<WorkerEvent>,
    mut manager: OfflineCacheManager,
) -> OfflineCacheManager {
    info!(cache = %manager.cache_name(), "offline worker started");

    while let Some(event) = rx.recv().await {
        match event {
            WorkerEvent::Install { done } => {
                let report = manager.install().await;
                let _ = done.send(report);
            }
            WorkerEvent::Activate { done } => {
                let deleted = manager.activate().await;
                let _ = done.send(deleted);
            }
            WorkerEvent::Fetch { request, respond_to } => {
                let outcome = manager.handle_fetch(&request).await;
                let _ = respond_to.send(outcome);
            }
            WorkerEvent::Push { data } => manager.handle_push(data.as_deref()).await,
            WorkerEvent::NotificationClick { action } => {
                manager.handle_notification_click(action.as_deref()).await
            }
            WorkerEvent::Message { data, reply } => {
                debug!(%data, "worker received message");
                if let Some(version) = manager.handle_message(data).await {
                    match reply {
                        Some(port) => {
                            let _ = port.send(version);
                        }
                        None => debug!("version requested without a reply port"),
                    }
                }
            }
        }
    }

    info!("offline worker stopped");
    manager
}

/// Sending side of a running worker. Cloning is cheap; dropping the last
/// clone stops the worker.
#[derive(Clone)]
pub struct OfflineHandle {
    tx: mpsc::Sender<WorkerEvent>,
}

/// Start the worker's event loop. Awaiting the join handle after dropping
/// every `OfflineHandle` returns the manager. A `capacity` of 0 is raised
/// to 1.
pub fn spawn(manager: OfflineCacheManager, capacity: usize) -> (OfflineHandle, JoinHandle<OfflineCacheManager>) {
    // mpsc::channel panics on a zero buffer
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let task = tokio::spawn(event_loop(rx, manager));
    (OfflineHandle { tx }, task)
}

fn stopped() -> OfflineError {
    OfflineError::Runtime("offline worker is not running".to_string())
}

impl OfflineHandle {
    pub async fn install(&self) -> Result<InstallReport, OfflineError> {
        let (done, rx) = oneshot::channel();
        self.send(WorkerEvent::Install { done }).await?;
        rx.await.map_err(|_| stopped())
    }

    pub async fn activate(&self) -> Result<Vec<String>, OfflineError> {
        let (done, rx) = oneshot::channel();
        self.send(WorkerEvent::Activate { done }).await?;
        rx.await.map_err(|_| stopped())
    }

    pub async fn fetch(&self, request: FetchRequest) -> Result<FetchOutcome, OfflineError> {
        let (respond_to, rx) = oneshot::channel();
        self.send(WorkerEvent::Fetch { request, respond_to }).await?;
        rx.await.map_err(|_| stopped())?
    }

    pub async fn push(&self, data: Option<Vec<u8>>) -> Result<(), OfflineError> {
        self.send(WorkerEvent::Push { data }).await
    }

    pub async fn notification_click(&self, action: Option<String>) -> Result<(), OfflineError> {
        self.send(WorkerEvent::NotificationClick { action }).await
    }

    /// Post a message; `GET_VERSION` resolves to the version reply.
    pub async fn message(&self, data: Value) -> Result<Option<VersionReply>, OfflineError> {
        let (port, rx) = oneshot::channel();
        self.send(WorkerEvent::Message {
            data,
            reply: Some(port),
        })
        .await?;
        // the port is dropped unanswered for messages that need no reply
        Ok(rx.await.ok())
    }

    async fn send(&self, event: WorkerEvent) -> Result<(), OfflineError> {
        self.tx.send(event).await.map_err(|_| stopped())
    }
}
