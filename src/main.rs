use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use skytracker_gateway::config::Args;
use skytracker_gateway::handlers::router;
use skytracker_gateway::logging::init_logging;
use skytracker_gateway::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let state = Arc::new(AppState::new(reqwest::Client::new(), &args));
    if state.aviationstack_key.is_none() {
        warn!("AVIATIONSTACK_API_KEY is not set, flight searches will fail");
    }

    let app = router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(port = args.port, "gateway running");
    info!(url = %args.aviationstack_url, "flight search upstream");
    info!(url = %args.opensky_url, "live position upstream");

    axum::serve(listener, app).await?;
    Ok(())
}
