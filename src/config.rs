//! Configuration module

use std::time::Duration;

use crate::constants;

/// Where classification events come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    /// Live `/predict` endpoint with synthetic fallback
    Live,
    /// Synthetic generator only (demo mode)
    Synthetic,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Classification API base URL
    pub api_url: String,

    /// Interval between polls
    pub poll_interval: Duration,

    /// Timeout for a single `/predict` request
    pub request_timeout: Duration,

    /// Source selection
    pub source: SourceMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: constants::DEFAULT_API_URL.to_string(),
            poll_interval: Duration::from_secs(constants::DEFAULT_POLL_INTERVAL),
            request_timeout: Duration::from_secs(constants::DEFAULT_REQUEST_TIMEOUT),
            source: SourceMode::Live,
        }
    }
}

impl Config {
    /// Load configuration from `.env` and environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            api_url: constants::get_api_url(),
            poll_interval: Duration::from_secs(constants::get_poll_interval()),
            request_timeout: Duration::from_secs(constants::get_request_timeout()),
            source: if constants::is_synthetic_mode() {
                SourceMode::Synthetic
            } else {
                SourceMode::Live
            },
        }
    }

    /// Full URL of the prediction endpoint
    pub fn predict_url(&self) -> String {
        format!("{}/predict", self.api_url)
    }
}
