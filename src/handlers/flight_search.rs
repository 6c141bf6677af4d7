use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{Method, StatusCode},
    response::Response,
};
use serde_json::{Value, json};
use tracing::{error, info};

use super::cors::{cors_response, preflight};
use crate::error::ProxyError;
use crate::models::FlightQuery;
use crate::state::AppState;

const ENDPOINT: &str = "flight-search";

// GET /flight-search?flight_iata=LH441
pub async fn flight_search_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if method == Method::OPTIONS {
        return preflight(ENDPOINT);
    }

    match search(&state, &method, &params).await {
        Ok(body) => cors_response(ENDPOINT, StatusCode::OK, &body),
        Err(ProxyError::Upstream(e)) => {
            error!(error = %e, "flight search failed");
            cors_response(
                ENDPOINT,
                StatusCode::INTERNAL_SERVER_ERROR,
                &json!({ "error": "Server error", "message": e.to_string() }),
            )
        }
        Err(e) => cors_response(ENDPOINT, e.status_code(), &json!({ "error": e.to_string() })),
    }
}

async fn search(
    state: &AppState,
    method: &Method,
    params: &HashMap<String, String>,
) -> Result<Value, ProxyError> {
    if *method != Method::GET {
        return Err(ProxyError::MethodNotAllowed);
    }
    let query = FlightQuery::iata_from(params)?;
    let key = state
        .aviationstack_key
        .as_deref()
        .ok_or(ProxyError::MissingApiKey)?;

    info!(flight_iata = query.code(), "searching flight");

    // body is handed back untouched
    let data = state
        .flights
        .clone()
        .with_key("access_key", key)
        .get_json("flights", &[(FlightQuery::IATA_PARAM, query.code())])
        .await?;
    Ok(data)
}
