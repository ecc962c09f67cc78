//! Classification Event Types
//!
//! One inference result from the traffic classification model.
//! Events are immutable once built; the aggregator only reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::labels::ThreatLabel;
use crate::constants::PROBABILITY_TOLERANCE;
use crate::error::{DashboardError, DashboardResult};

// ============================================================================
// EVENT ID
// ============================================================================

/// Unique event id: millisecond time plus a random tie-breaker
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate an id for an event produced at `at`
    pub fn generate(at: DateTime<Utc>) -> Self {
        let nonce = Uuid::new_v4().simple().to_string();
        Self(format!("{}-{}", at.timestamp_millis(), &nonce[..8]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Endpoints send ids either as strings or as numbers
impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => EventId(s),
            RawId::Number(n) => EventId(n.to_string()),
        })
    }
}

// ============================================================================
// CLASSIFICATION EVENT
// ============================================================================

/// A single classification result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationEvent {
    pub id: EventId,
    pub timestamp: DateTime<Utc>,
    /// Wire label, checked against the fixed set by `validate`
    #[serde(rename = "prediction")]
    pub label: String,
    /// Authoritative confidence; never recomputed from the distribution
    pub confidence: f64,
    #[serde(rename = "probabilities")]
    pub class_probabilities: BTreeMap<String, f64>,
    /// Diagnostic payload, opaque to the aggregator
    #[serde(default)]
    pub features: Vec<f64>,
}

impl ClassificationEvent {
    /// Validate against the fixed label set and return the parsed label.
    pub fn validate(&self) -> DashboardResult<ThreatLabel> {
        let label: ThreatLabel = self.label.parse()?;

        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(DashboardError::MalformedEvent(format!(
                "confidence {} outside [0, 1]",
                self.confidence
            )));
        }

        let mut sum = 0.0;
        for (name, p) in &self.class_probabilities {
            name.parse::<ThreatLabel>()?;
            if !p.is_finite() || *p < 0.0 {
                return Err(DashboardError::MalformedEvent(format!(
                    "probability for '{}' is {}",
                    name, p
                )));
            }
            sum += p;
        }

        if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(DashboardError::MalformedEvent(format!(
                "probabilities sum to {:.4}",
                sum
            )));
        }

        Ok(label)
    }

    pub fn is_threat(&self) -> bool {
        self.label != ThreatLabel::Benign.as_str()
    }
}
