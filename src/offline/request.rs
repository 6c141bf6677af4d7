//! Request and response snapshots seen by the offline cache manager.

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode};
use reqwest::Url;
use sha2::{Digest, Sha256};

/// What the page intends to do with the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Top-level navigation.
    Document,
    Script,
    Style,
    Image,
    Manifest,
    Other,
}

#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub method: Method,
    pub url: Url,
    pub destination: Destination,
}

impl FetchRequest {
    pub fn new(method: Method, url: Url, destination: Destination) -> Self {
        Self {
            method,
            url,
            destination,
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url, Destination::Other)
    }

    pub fn navigate(url: Url) -> Self {
        Self::new(Method::GET, url, Destination::Document)
    }

    pub fn is_navigation(&self) -> bool {
        self.destination == Destination::Document
    }

    /// Identity of the request inside a cache generation: digest of
    /// method and URL. Fragments never reach the network, so they are
    /// left out.
    pub fn cache_key(&self) -> String {
        let mut url = self.url.clone();
        url.set_fragment(None);

        let mut hasher = Sha256::new();
        hasher.update(self.method.as_str());
        hasher.update(b" ");
        hasher.update(url.as_str());
        format!("{:x}", hasher.finalize())
    }
}

/// Response type as a browser classifies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Same-origin.
    Basic,
    /// Cross-origin, readable.
    Cors,
    /// Cross-origin, unreadable.
    Opaque,
}

/// A response snapshot. Cloning is cheap, the body is reference counted.
#[derive(Debug, Clone)]
pub struct StoredResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub kind: ResponseKind,
}

impl StoredResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>, kind: ResponseKind) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
            kind,
        }
    }

    /// Only a readable 200 is worth keeping.
    pub fn is_cacheable(&self) -> bool {
        self.status == StatusCode::OK && self.kind != ResponseKind::Opaque
    }
}
