//! Logic Module - Business Logic & Engines
//!
//! ## Architecture
//! - `labels` / `event` - fixed class set and classification events
//! - `aggregator/` - pure state transitions (feed, histogram, series, alerts, stats)
//! - `source/` - live `/predict` client, synthetic generator, fallback chain
//! - `expiry` - per-alert dismissal timers
//! - `service` - polling loop and snapshot publication

pub mod labels;
pub mod event;
pub mod aggregator;
pub mod source;
pub mod expiry;
pub mod service;
