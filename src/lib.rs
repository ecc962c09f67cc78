//! ThreatWatch Core
//!
//! Headless core of a live traffic-classification dashboard: polls a remote
//! classifier, folds every result into bounded views and publishes read-only
//! snapshots for a presentation layer.

pub mod config;
pub mod constants;
pub mod error;
pub mod logic;

pub use config::{Config, SourceMode};
pub use error::{DashboardError, DashboardResult};
pub use logic::aggregator::{DashboardState, DashboardView};
pub use logic::event::{ClassificationEvent, EventId};
pub use logic::labels::ThreatLabel;
pub use logic::service::{DashboardHandle, DashboardService, DashboardSnapshot};
pub use logic::source::{ConfiguredSource, ConnectionStatus, EventSource, StatusCell};
