//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change the default classification endpoint, only edit this file.

/// Default classification API base URL
///
/// This is the fallback URL when no environment variable is set.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default polling interval (seconds)
pub const DEFAULT_POLL_INTERVAL: u64 = 5;

/// Default request timeout for `/predict` (seconds)
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 10;

/// Feed window size (most recent events kept)
pub const FEED_CAPACITY: usize = 100;

/// Rolling time series size (buckets)
pub const SERIES_CAPACITY: usize = 50;

/// Maximum live alerts
pub const ALERT_CAPACITY: usize = 5;

/// Alert dwell time before auto-dismiss (seconds)
pub const ALERT_DWELL_SECS: u64 = 5;

/// Allowed deviation of the probability sum from 1.0
pub const PROBABILITY_TOLERANCE: f64 = 0.01;

/// Feature vector length produced by the synthetic source
pub const FEATURE_COUNT: usize = 35;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "ThreatWatch";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get classification API URL from environment or use default
pub fn get_api_url() -> String {
    std::env::var("DASHBOARD_API_URL")
        .map(|s| s.trim_end_matches('/').to_string())
        .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// Get polling interval from environment or use default
pub fn get_poll_interval() -> u64 {
    std::env::var("DASHBOARD_POLL_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_POLL_INTERVAL)
}

/// Get request timeout from environment or use default
pub fn get_request_timeout() -> u64 {
    std::env::var("DASHBOARD_REQUEST_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT)
}

/// Check if demo mode (synthetic source only) is requested
pub fn is_synthetic_mode() -> bool {
    std::env::var("DASHBOARD_SOURCE")
        .map(|s| s.eq_ignore_ascii_case("synthetic") || s.eq_ignore_ascii_case("demo"))
        .unwrap_or(false)
}
