//! Alert Queue
//!
//! Last M threat alerts, newest first. Two independent ways out of the queue:
//! truncation (oldest beyond capacity is dropped) and per-alert expiry after a
//! fixed dwell measured from the alert's own creation.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::VecDeque;

use crate::logic::event::EventId;
use crate::logic::labels::ThreatLabel;

/// Transient notification for one non-benign event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub id: EventId,
    pub label: ThreatLabel,
    pub confidence: f64,
    /// Event timestamp (as reported by the source)
    pub timestamp: DateTime<Utc>,
    /// When the alert entered the queue
    pub created_at: DateTime<Utc>,
}

impl Alert {
    pub fn expires_at(&self, dwell: Duration) -> DateTime<Utc> {
        self.created_at + dwell
    }

    pub fn is_expired(&self, now: DateTime<Utc>, dwell: Duration) -> bool {
        now >= self.expires_at(dwell)
    }
}

#[derive(Debug, Clone)]
pub struct AlertQueue {
    alerts: VecDeque<Alert>,
    capacity: usize,
    dwell: Duration,
}

impl AlertQueue {
    pub fn new(capacity: usize, dwell: Duration) -> Self {
        Self {
            alerts: VecDeque::with_capacity(capacity + 1),
            capacity,
            dwell,
        }
    }

    pub fn dwell(&self) -> Duration {
        self.dwell
    }

    /// Prepend an alert. Returns the alerts pushed out by truncation.
    pub fn push(&mut self, alert: Alert) -> Vec<Alert> {
        self.alerts.push_front(alert);
        let mut evicted = Vec::new();
        while self.alerts.len() > self.capacity {
            if let Some(old) = self.alerts.pop_back() {
                evicted.push(old);
            }
        }
        evicted
    }

    /// Remove every alert whose dwell has elapsed. Returns the removed ids.
    pub fn expire(&mut self, now: DateTime<Utc>) -> Vec<EventId> {
        let dwell = self.dwell;
        let mut removed = Vec::new();
        self.alerts.retain(|alert| {
            if alert.is_expired(now, dwell) {
                removed.push(alert.id.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    /// Manual dismissal. Other alerts are untouched.
    pub fn dismiss(&mut self, id: &EventId) -> bool {
        let before = self.alerts.len();
        self.alerts.retain(|alert| &alert.id != id);
        self.alerts.len() != before
    }

    pub fn contains(&self, id: &EventId) -> bool {
        self.alerts.iter().any(|alert| &alert.id == id)
    }

    /// Alerts still live at `now`, newest first
    pub fn live(&self, now: DateTime<Utc>) -> Vec<Alert> {
        self.alerts
            .iter()
            .filter(|alert| !alert.is_expired(now, self.dwell))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}
