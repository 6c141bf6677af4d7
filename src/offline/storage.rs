//! Versioned cache generations and the storage holding them.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use super::request::{FetchRequest, StoredResponse};
use crate::error::OfflineError;

/// A named set of cached responses. Superseded wholesale when the version
/// changes.
#[derive(Debug, Default)]
pub struct CacheGeneration {
    name: String,
    entries: DashMap<String, StoredResponse>, // cache_key -> snapshot
}

impl CacheGeneration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: DashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lookup(&self, request: &FetchRequest) -> Option<StoredResponse> {
        self.entries.get(&request.cache_key()).map(|e| e.value().clone())
    }

    /// Store a snapshot, replacing any earlier one for the same request.
    pub fn put(&self, request: &FetchRequest, response: StoredResponse) {
        self.entries.insert(request.cache_key(), response);
    }

    pub fn contains(&self, request: &FetchRequest) -> bool {
        self.entries.contains_key(&request.cache_key())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where cache generations live. Every call may fail; callers log and
/// carry on.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Open a generation, creating it if needed.
    async fn open(&self, name: &str) -> Result<Arc<CacheGeneration>, OfflineError>;

    /// Names of all generations, sorted.
    async fn keys(&self) -> Result<Vec<String>, OfflineError>;

    /// Delete a generation. Returns whether it existed.
    async fn delete(&self, name: &str) -> Result<bool, OfflineError>;
}

/// In-process storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    generations: DashMap<String, Arc<CacheGeneration>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStorage for MemoryStorage {
    async fn open(&self, name: &str) -> Result<Arc<CacheGeneration>, OfflineError> {
        let generation = self
            .generations
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(CacheGeneration::new(name)));
        Ok(Arc::clone(generation.value()))
    }

    async fn keys(&self) -> Result<Vec<String>, OfflineError> {
        let mut names: Vec<String> = self.generations.iter().map(|e| e.key().clone()).collect();
        names.sort();
        Ok(names)
    }

    async fn delete(&self, name: &str) -> Result<bool, OfflineError> {
        Ok(self.generations.remove(name).is_some())
    }
}
