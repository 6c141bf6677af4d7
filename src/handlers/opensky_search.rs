use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{Method, StatusCode},
    response::Response,
};
use tracing::{info, warn};

use super::cors::{cors_response, preflight};
use crate::error::ProxyError;
use crate::models::{FlightQuery, LiveEnvelope, StateVector, StatesResponse};
use crate::state::AppState;

const ENDPOINT: &str = "opensky-search";

// GET /opensky-search?icao24=3c6444
pub async fn opensky_search_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if method == Method::OPTIONS {
        return preflight(ENDPOINT);
    }

    match live_state(&state, &method, &params).await {
        Ok(data) => cors_response(ENDPOINT, StatusCode::OK, &LiveEnvelope::ok(data)),
        Err(e) => {
            warn!(error = %e, "live position lookup failed");
            cors_response(ENDPOINT, e.status_code(), &LiveEnvelope::failed(e.to_string()))
        }
    }
}

async fn live_state(
    state: &AppState,
    method: &Method,
    params: &HashMap<String, String>,
) -> Result<StateVector, ProxyError> {
    if *method != Method::GET {
        return Err(ProxyError::MethodNotAllowed);
    }
    let query = FlightQuery::icao24_from(params)?;

    info!(icao24 = query.code(), "fetching live state");

    let raw = state
        .opensky
        .get_json("states/all", &[(FlightQuery::ICAO24_PARAM, query.code())])
        .await?;

    // an unexpected shape means there is nothing usable to return
    let states: StatesResponse = serde_json::from_value(raw).unwrap_or_default();
    states
        .first_state()
        .ok_or_else(|| ProxyError::NoStateVector(query.code().to_string()))
}
