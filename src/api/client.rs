//! HTTP client construction with connection pooling.

use std::time::Duration;

/// Build the shared HTTP client used for token requests and batch traffic.
pub fn build_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .user_agent("spo-cli/1.0")
        .build()
        .expect("Failed to build HTTP client")
}
