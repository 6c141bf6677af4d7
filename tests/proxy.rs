use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use reqwest::{Client, Method};
use serde_json::{Value, json};

use skytracker_gateway::handlers::router;
use skytracker_gateway::live::LiveFlightClient;
use skytracker_gateway::state::AppState;
use skytracker_gateway::upstream::UpstreamClient;

const KEY: &str = "test-key";

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn flight_payload() -> Value {
    json!({
        "pagination": {"limit": 100, "offset": 0, "count": 1, "total": 1},
        "data": [{
            "flight_status": "active",
            "departure": {"iata": "FRA", "scheduled": "2024-05-01T13:55:00+00:00"},
            "arrival": {"iata": "IAD", "estimated": null},
            "flight": {"iata": "LH441", "number": "441"}
        }]
    })
}

// AviationStack look-alike
async fn flights(Query(params): Query<HashMap<String, String>>) -> Response {
    if params.get("access_key").map(String::as_str) != Some(KEY) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "invalid key"}))).into_response();
    }
    match params.get("flight_iata").map(String::as_str) {
        Some("LH441") => Json(flight_payload()).into_response(),
        Some("BADJSON") => (StatusCode::OK, "<html>oops</html>").into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))).into_response(),
    }
}

// OpenSky look-alike
async fn states(Query(params): Query<HashMap<String, String>>) -> Response {
    match params.get("icao24").map(String::as_str) {
        Some("3c6444") => Json(json!({
            "time": 1714571000,
            "states": [[
                "3c6444", "DLH441  ", "Germany", 1714570990, 1714570999, 8.5706, 50.0333,
                10972.8, false, 100.4, 271.3, -0.33, null, 11277.6, "1000", false, 0
            ]]
        }))
        .into_response(),
        Some("broken") => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => Json(json!({"time": 1714571000, "states": null})).into_response(),
    }
}

async fn upstream() -> String {
    serve(
        Router::new()
            .route("/v1/flights", get(flights))
            .route("/api/states/all", get(states)),
    )
    .await
}

async fn gateway_with_key(upstream: &str, key: Option<&str>) -> String {
    let client = Client::new();
    let state = AppState {
        flights: UpstreamClient::new(client.clone(), format!("{}/v1", upstream)),
        opensky: UpstreamClient::new(client, format!("{}/api", upstream)),
        aviationstack_key: key.map(str::to_string),
    };
    serve(router(Arc::new(state))).await
}

async fn gateway() -> String {
    gateway_with_key(&upstream().await, Some(KEY)).await
}

fn assert_cors(response: &reqwest::Response) {
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
    assert_eq!(headers["access-control-allow-methods"], "GET, POST, OPTIONS");
}

#[tokio::test]
async fn preflight_returns_empty_body_with_cors() {
    let base = gateway().await;
    let client = Client::new();

    for url in [
        format!("{}/flight-search", base),
        format!("{}/flight-search?flight_iata=LH441", base),
        format!("{}/opensky-search", base),
    ] {
        let response = client.request(Method::OPTIONS, &url).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response);
        assert_eq!(response.text().await.unwrap(), "");
    }
}

#[tokio::test]
async fn other_methods_are_rejected() {
    let base = gateway().await;
    let response = Client::new()
        .post(format!("{}/flight-search?flight_iata=LH441", base))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_cors(&response);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn missing_flight_code_is_bad_request() {
    let base = gateway().await;
    for url in [
        format!("{}/flight-search", base),
        format!("{}/flight-search?flight_iata=", base),
        format!("{}/flight-search?other=1", base),
    ] {
        let response = reqwest::get(&url).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_cors(&response);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("flight_iata"));
    }
}

#[tokio::test]
async fn missing_api_key_is_server_error() {
    let base = gateway_with_key(&upstream().await, None).await;
    let response = reqwest::get(format!("{}/flight-search?flight_iata=LH441", base))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "API key not configured"}));
}

#[tokio::test]
async fn upstream_body_is_passed_through() {
    let base = gateway().await;
    let response = reqwest::get(format!("{}/flight-search?flight_iata=LH441", base))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_cors(&response);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, flight_payload());
}

#[tokio::test]
async fn upstream_not_found_becomes_server_error() {
    let base = gateway().await;
    let response = reqwest::get(format!("{}/flight-search?flight_iata=XX000", base))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors(&response);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Server error");
    assert!(body["message"].as_str().unwrap().contains("404"));
}

#[tokio::test]
async fn upstream_invalid_json_becomes_server_error() {
    let base = gateway().await;
    let response = reqwest::get(format!("{}/flight-search?flight_iata=BADJSON", base))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let text = response.text().await.unwrap();
    assert!(!text.contains(KEY));
    assert!(!text.contains("access_key"));
    let body: Value = serde_json::from_str(&text).unwrap();
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn unreachable_upstream_becomes_server_error() {
    let base = gateway_with_key("http://127.0.0.1:9", Some(KEY)).await;
    let response = reqwest::get(format!("{}/flight-search?flight_iata=LH441", base))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let text = response.text().await.unwrap();
    assert!(!text.contains(KEY));
    assert!(!text.contains("access_key"));
    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["error"], "Server error");
    assert!(body["message"].as_str().unwrap().starts_with("network error"));
}

#[tokio::test]
async fn live_state_is_returned_with_opensky_fields() {
    let base = gateway().await;
    for path in ["opensky-search", "live"] {
        let response = reqwest::get(format!("{}/{}?icao24=3C6444", base, path))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["icao24"], "3c6444");
        assert_eq!(body["data"]["callsign"], "DLH441");
        assert_eq!(body["data"]["baro_altitude"], 10972.8);
        assert_eq!(body["data"]["velocity"], 100.4);
        assert_eq!(body["data"]["true_track"], 271.3);
    }
}

#[tokio::test]
async fn live_lookup_failures_use_the_envelope() {
    let base = gateway().await;

    let missing = reqwest::get(format!("{}/opensky-search", base)).await.unwrap();
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());

    let unknown = reqwest::get(format!("{}/opensky-search?icao24=abcdef", base)).await.unwrap();
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    let body: Value = unknown.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body.get("data").is_none());

    let broken = reqwest::get(format!("{}/opensky-search?icao24=broken", base)).await.unwrap();
    assert_eq!(broken.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = broken.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn live_client_normalizes_position() {
    let base = gateway().await;
    let live = LiveFlightClient::new(Client::new(), format!("{}/opensky-search", base));

    let position = live.live_position("3c6444").await.unwrap();
    assert_eq!(position.icao24, "3c6444");
    assert_eq!(position.altitude, Some(10972.8));
    // 100.4 m/s = 361.44 km/h
    assert_eq!(position.speed_horizontal, Some(361));
    assert_eq!(position.heading, Some(271.3));
    assert_eq!(position.callsign.as_deref(), Some("DLH441"));
}

#[tokio::test]
async fn live_client_returns_none_on_failure() {
    let base = gateway().await;
    let live = LiveFlightClient::new(Client::new(), format!("{}/opensky-search", base));
    assert!(live.live_position("abcdef").await.is_none());
    assert!(live.live_position("broken").await.is_none());

    let unreachable = LiveFlightClient::new(Client::new(), "http://127.0.0.1:9/opensky-search");
    assert!(unreachable.live_position("3c6444").await.is_none());

    // a server that answers 200 without the envelope
    let odd = serve(Router::new().route("/live", get(|| async { Json(json!({"states": []})) }))).await;
    let odd = LiveFlightClient::new(Client::new(), format!("{}/live", odd));
    assert!(odd.live_position("3c6444").await.is_none());
}

#[tokio::test]
async fn health_and_metrics_endpoints() {
    let base = gateway().await;

    let health: Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "healthy");
    assert!(health["timestamp"].is_string());

    reqwest::get(format!("{}/flight-search", base)).await.unwrap();
    let metrics = reqwest::get(format!("{}/metrics", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(metrics.contains("skytracker_proxy_requests_total"));
}
