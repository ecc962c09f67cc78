//! Aggregator Module - Dashboard State Transitions
//!
//! Folds classification events, one at a time, into bounded views:
//! - `feed` - last N events, newest first
//! - `histogram` - running count per label
//! - `series` - rolling window of per-event buckets
//! - `alerts` - last M threat alerts with individual expiry
//! - `stats` - totals, threat ratio, throughput
//!
//! `apply` must be called sequentially. Validation runs before any view is
//! touched, so a rejected event leaves the state exactly as it was.

pub mod alerts;
pub mod feed;
pub mod histogram;
pub mod series;
pub mod stats;


pub use alerts::{Alert, AlertQueue};
pub use feed::FeedWindow;
pub use histogram::{ClassHistogram, Distribution, DistributionSlice};
pub use series::{SeriesBucket, TimeSeries};
pub use stats::RunningStats;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::constants;
use crate::error::DashboardResult;
use crate::logic::event::{ClassificationEvent, EventId};
use crate::logic::labels::ThreatLabel;

/// Round to one decimal place
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ============================================================================
// CONFIG
// ============================================================================

/// Window sizes and alert dwell
#[derive(Debug, Clone, Copy)]
pub struct AggregatorConfig {
    pub feed_capacity: usize,
    pub series_capacity: usize,
    pub alert_capacity: usize,
    pub alert_dwell: Duration,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            feed_capacity: constants::FEED_CAPACITY,
            series_capacity: constants::SERIES_CAPACITY,
            alert_capacity: constants::ALERT_CAPACITY,
            alert_dwell: Duration::seconds(constants::ALERT_DWELL_SECS as i64),
        }
    }
}

// ============================================================================
// STATE
// ============================================================================

/// Result of a successful `apply`
#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    pub label: ThreatLabel,
    /// Alert raised by this event, if it was a threat
    pub alert: Option<Alert>,
    /// Alerts pushed out of the queue by truncation
    pub evicted_alerts: Vec<EventId>,
}

/// Dashboard state for one session. Owned and mutated only by the aggregator.
#[derive(Debug, Clone)]
pub struct DashboardState {
    session_start: DateTime<Utc>,
    feed: FeedWindow,
    histogram: ClassHistogram,
    series: TimeSeries,
    alerts: AlertQueue,
    stats: RunningStats,
}

impl DashboardState {
    /// Empty state for a session starting at `session_start`
    pub fn new(session_start: DateTime<Utc>) -> Self {
        Self::with_config(AggregatorConfig::default(), session_start)
    }

    pub fn with_config(config: AggregatorConfig, session_start: DateTime<Utc>) -> Self {
        Self {
            session_start,
            feed: FeedWindow::new(config.feed_capacity),
            histogram: ClassHistogram::new(),
            series: TimeSeries::new(config.series_capacity),
            alerts: AlertQueue::new(config.alert_capacity, config.alert_dwell),
            stats: RunningStats::default(),
        }
    }

    /// Fold one event into every view.
    pub fn apply(
        &mut self,
        event: ClassificationEvent,
        now: DateTime<Utc>,
    ) -> DashboardResult<ApplyOutcome> {
        let label = event.validate()?;

        // 1. Alert (built before the event moves into the feed)
        let alert = label.is_threat().then(|| Alert {
            id: event.id.clone(),
            label,
            confidence: event.confidence,
            timestamp: event.timestamp,
            created_at: now,
        });

        // 2. Feed
        self.feed.push(event);

        // 3. Histogram
        self.histogram.increment(label);

        // 4. Alert queue
        let evicted_alerts = match &alert {
            Some(a) => self
                .alerts
                .push(a.clone())
                .into_iter()
                .map(|old| old.id)
                .collect(),
            None => Vec::new(),
        };

        // 5. Series
        self.series.record(label, now);

        // 6. Stats
        self.stats.record(label.is_threat(), self.session_start, now);

        Ok(ApplyOutcome {
            label,
            alert,
            evicted_alerts,
        })
    }

    /// Drop alerts whose dwell has elapsed
    pub fn expire_alerts(&mut self, now: DateTime<Utc>) -> Vec<EventId> {
        self.alerts.expire(now)
    }

    /// Manual dismissal of one alert
    pub fn dismiss_alert(&mut self, id: &EventId) -> bool {
        self.alerts.dismiss(id)
    }

    pub fn session_start(&self) -> DateTime<Utc> {
        self.session_start
    }

    pub fn feed(&self) -> &FeedWindow {
        &self.feed
    }

    pub fn histogram(&self) -> &ClassHistogram {
        &self.histogram
    }

    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    pub fn alert_queue(&self) -> &AlertQueue {
        &self.alerts
    }

    /// Live alerts at `now`; expired ones are never returned
    pub fn alerts(&self, now: DateTime<Utc>) -> Vec<Alert> {
        self.alerts.live(now)
    }

    pub fn stats(&self) -> RunningStats {
        self.stats
    }

    /// Most recently applied event
    pub fn current(&self) -> Option<&ClassificationEvent> {
        self.feed.latest()
    }

    /// Read-only copy of every view at `now`
    pub fn view(&self, now: DateTime<Utc>) -> DashboardView {
        DashboardView {
            session_start: self.session_start,
            current: CurrentStatus::from_event(self.current()),
            feed: self.feed.to_vec(),
            histogram: self.histogram.counts().clone(),
            distribution: self.histogram.distribution(),
            series: self.series.to_vec(),
            alerts: self.alerts(now),
            stats: self.stats,
        }
    }
}

// ============================================================================
// VIEWS
// ============================================================================

/// Hero status for the latest event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentStatus {
    pub label: ThreatLabel,
    pub confidence: f64,
    pub is_threat: bool,
    pub headline: &'static str,
}

impl CurrentStatus {
    fn from_event(event: Option<&ClassificationEvent>) -> Self {
        // Feed only holds validated events; an unknown label cannot appear here.
        let label = event
            .and_then(|e| e.label.parse().ok())
            .unwrap_or(ThreatLabel::Benign);
        let is_threat = label.is_threat();

        Self {
            label,
            confidence: event.map(|e| e.confidence).unwrap_or(0.0),
            is_threat,
            headline: if is_threat { "THREAT DETECTED" } else { "SECURE" },
        }
    }
}

/// Plain data copy of the dashboard for presentation
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub session_start: DateTime<Utc>,
    pub current: CurrentStatus,
    pub feed: Vec<ClassificationEvent>,
    pub histogram: BTreeMap<ThreatLabel, u64>,
    pub distribution: Distribution,
    pub series: Vec<SeriesBucket>,
    pub alerts: Vec<Alert>,
    pub stats: RunningStats,
}
