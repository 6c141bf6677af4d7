use crate::config::Args;
use crate::upstream::UpstreamClient;

// app's shared state, read-only after startup
pub struct AppState {
    pub flights: UpstreamClient,            // AviationStack
    pub opensky: UpstreamClient,            // OpenSky
    pub aviationstack_key: Option<String>,  // checked per request, may be unset
}

impl AppState {
    pub fn new(client: reqwest::Client, args: &Args) -> Self {
        Self {
            flights: UpstreamClient::new(client.clone(), &args.aviationstack_url),
            opensky: UpstreamClient::new(client, &args.opensky_url),
            aviationstack_key: args
                .aviationstack_key
                .clone()
                .filter(|k| !k.trim().is_empty()),
        }
    }
}
