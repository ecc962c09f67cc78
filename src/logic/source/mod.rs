//! Source Module - Where classification events come from
//!
//! This module handles:
//! - Polling the live `/predict` endpoint
//! - Synthetic events for demo mode and as fallback
//! - Connection health (separate from dashboard state)

pub mod client;
pub mod synthetic;

pub use client::{PredictClient, PredictResponse};
pub use synthetic::SyntheticSource;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;

use crate::config::{Config, SourceMode};
use crate::error::DashboardResult;
use crate::logic::event::ClassificationEvent;

// ============================================================================
// SOURCE CONTRACT
// ============================================================================

/// Anything that can hand out the next classification event
pub trait EventSource: Send {
    fn fetch_next(&mut self) -> impl Future<Output = DashboardResult<ClassificationEvent>> + Send;
}

// ============================================================================
// CONNECTION STATUS
// ============================================================================

/// Backend connection state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    Error,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Error => "error",
        }
    }

    /// Short badge text
    pub fn display_text(&self) -> &'static str {
        match self {
            ConnectionStatus::Connected => "LIVE",
            ConnectionStatus::Connecting => "CONNECTING...",
            ConnectionStatus::Error => "DEMO MODE",
        }
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Shared connection status, written by the source, read by snapshots
#[derive(Debug, Clone, Default)]
pub struct StatusCell(Arc<RwLock<ConnectionStatus>>);

impl StatusCell {
    pub fn get(&self) -> ConnectionStatus {
        *self.0.read()
    }

    pub fn set(&self, status: ConnectionStatus) {
        let mut current = self.0.write();
        if *current != status {
            log::info!("Connection status: {} -> {}", *current, status);
            *current = status;
        }
    }
}

// ============================================================================
// FALLBACK CHAIN
// ============================================================================

/// Live source with synthetic substitution on failure.
/// The aggregator never observes a gap.
pub struct FallbackSource<P> {
    primary: P,
    fallback: SyntheticSource,
    status: StatusCell,
}

impl<P: EventSource> FallbackSource<P> {
    pub fn new(primary: P, fallback: SyntheticSource, status: StatusCell) -> Self {
        Self {
            primary,
            fallback,
            status,
        }
    }

    pub fn status(&self) -> &StatusCell {
        &self.status
    }
}

impl<P: EventSource> EventSource for FallbackSource<P> {
    async fn fetch_next(&mut self) -> DashboardResult<ClassificationEvent> {
        match self.primary.fetch_next().await {
            Ok(event) => {
                self.status.set(ConnectionStatus::Connected);
                Ok(event)
            }
            Err(e) => {
                log::warn!("Failed to fetch prediction: {} - using synthetic event", e);
                self.status.set(ConnectionStatus::Error);
                self.fallback.fetch_next().await
            }
        }
    }
}

// ============================================================================
// CONFIGURED SOURCE
// ============================================================================

/// Source selected by configuration
pub enum ConfiguredSource {
    Live(FallbackSource<PredictClient>),
    Synthetic(SyntheticSource),
}

impl ConfiguredSource {
    pub fn from_config(config: &Config, status: StatusCell) -> DashboardResult<Self> {
        match config.source {
            SourceMode::Live => {
                let client = PredictClient::new(config)?;
                Ok(ConfiguredSource::Live(FallbackSource::new(
                    client,
                    SyntheticSource::new(),
                    status,
                )))
            }
            SourceMode::Synthetic => {
                status.set(ConnectionStatus::Error);
                Ok(ConfiguredSource::Synthetic(SyntheticSource::new()))
            }
        }
    }
}

impl EventSource for ConfiguredSource {
    async fn fetch_next(&mut self) -> DashboardResult<ClassificationEvent> {
        match self {
            ConfiguredSource::Live(source) => source.fetch_next().await,
            ConfiguredSource::Synthetic(source) => source.fetch_next().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;

    struct Down;

    impl EventSource for Down {
        async fn fetch_next(&mut self) -> DashboardResult<ClassificationEvent> {
            Err(DashboardError::SourceUnavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_fallback_substitutes_synthetic() {
        let status = StatusCell::default();
        assert_eq!(status.get(), ConnectionStatus::Connecting);

        let mut source = FallbackSource::new(Down, SyntheticSource::with_seed(7), status.clone());
        let event = source.fetch_next().await.unwrap();

        assert!(event.validate().is_ok());
        assert_eq!(status.get(), ConnectionStatus::Error);
    }

    #[tokio::test]
    async fn test_primary_success_marks_connected() {
        let status = StatusCell::default();
        let mut source = FallbackSource::new(
            SyntheticSource::with_seed(1),
            SyntheticSource::with_seed(2),
            status.clone(),
        );
        source.fetch_next().await.unwrap();
        assert_eq!(status.get(), ConnectionStatus::Connected);
    }

    #[test]
    fn test_status_text() {
        assert_eq!(ConnectionStatus::Connected.display_text(), "LIVE");
        assert_eq!(ConnectionStatus::Error.display_text(), "DEMO MODE");
        assert_eq!(
            serde_json::to_string(&ConnectionStatus::Connecting).unwrap(),
            "\"connecting\""
        );
    }
}
