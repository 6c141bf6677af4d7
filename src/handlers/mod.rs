mod cors;
mod flight_search;
mod health;
mod metrics;
mod opensky_search;

use std::sync::Arc;

use axum::{Router, routing::{any, get}};

use crate::state::AppState;

pub use cors::{cors_headers, cors_response};
pub use flight_search::flight_search_handler;
pub use health::health_handler;
pub use metrics::metrics_handler;
pub use opensky_search::opensky_search_handler;

// Routes served by the gateway
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/flight-search", any(flight_search_handler))
        .route("/opensky-search", any(opensky_search_handler))
        .route("/live", any(opensky_search_handler)) // name used by the browser helper
        .with_state(state)
}
