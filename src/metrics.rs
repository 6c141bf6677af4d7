use lazy_static::lazy_static;
use prometheus::{
    Counter, Gauge, Histogram, IntCounterVec, register_counter, register_gauge, register_histogram,
    register_int_counter_vec,
};

lazy_static! {
    pub static ref PROXY_REQUESTS: IntCounterVec = register_int_counter_vec!(
        "skytracker_proxy_requests_total",
        "Proxy requests by endpoint and response status",
        &["endpoint", "status"]
    )
    .expect("proxy request counter registers once");
    pub static ref UPSTREAM_FAILURES: Counter =
        register_counter!("skytracker_upstream_failures_total", "Failed upstream calls")
            .expect("upstream failure counter registers once");
    pub static ref UPSTREAM_LATENCY: Histogram = register_histogram!(
        "skytracker_upstream_latency_seconds",
        "Upstream call latency in seconds"
    )
    .expect("upstream latency histogram registers once");
    pub static ref OFFLINE_CACHE_HITS: Counter =
        register_counter!("skytracker_offline_cache_hits_total", "Offline cache hits")
            .expect("cache hit counter registers once");
    pub static ref OFFLINE_CACHE_MISSES: Counter =
        register_counter!("skytracker_offline_cache_misses_total", "Offline cache misses")
            .expect("cache miss counter registers once");
    pub static ref OFFLINE_CACHE_SIZE: Gauge = register_gauge!(
        "skytracker_offline_cache_entries",
        "Entries in the current cache generation"
    )
    .expect("cache size gauge registers once");
}
