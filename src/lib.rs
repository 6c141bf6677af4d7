//! Backend glue for the SkyTracker flight-tracking app: proxy endpoints for
//! AviationStack and OpenSky, and an offline cache manager for the browser
//! side.

pub mod config;
pub mod error;
pub mod handlers;
pub mod live;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod offline;
pub mod state;
pub mod upstream;
