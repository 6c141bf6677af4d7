use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::metrics::PROXY_REQUESTS;

// Any origin may call the proxies. A deployment serving a single site
// should pin the origin here.
pub fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers
}

// JSON body with CORS headers, counted per endpoint and status
pub fn cors_response<T: Serialize>(endpoint: &'static str, status: StatusCode, body: &T) -> Response {
    PROXY_REQUESTS
        .with_label_values(&[endpoint, status.as_str()])
        .inc();
    (status, cors_headers(), Json(body)).into_response()
}

// Preflight answer: headers only, empty body
pub fn preflight(endpoint: &'static str) -> Response {
    PROXY_REQUESTS
        .with_label_values(&[endpoint, StatusCode::OK.as_str()])
        .inc();
    (StatusCode::OK, cors_headers(), "").into_response()
}
