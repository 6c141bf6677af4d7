//! Offline cache manager: cache-first request handling with versioned
//! cache generations, plus the push and message events of a service
//! worker. Host facilities come in through the traits in [`host`].

pub mod host;
pub mod manager;
pub mod notification;
pub mod request;
pub mod scope;
pub mod storage;
pub mod worker;

pub use host::{Fetcher, Notifier, ReqwestFetcher, WorkerRuntime};
pub use manager::{FetchOutcome, InstallReport, LifecyclePhase, OfflineCacheManager, VersionReply, WorkerMessage};
pub use notification::{NotificationAction, NotificationOptions, PushPayload};
pub use request::{Destination, FetchRequest, ResponseKind, StoredResponse};
pub use scope::should_intercept;
pub use storage::{CacheGeneration, CacheStorage, MemoryStorage};
pub use worker::{OfflineHandle, WorkerEvent, spawn};
