//! Synthetic Source - Demo data generator
//!
//! Mostly benign traffic with occasional threats, skewed like the training
//! data. Used for demo mode and whenever the live endpoint is down.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

use super::EventSource;
use crate::constants::FEATURE_COUNT;
use crate::error::DashboardResult;
use crate::logic::event::{ClassificationEvent, EventId};
use crate::logic::labels::ThreatLabel;

/// Label weights, same order as `ThreatLabel::ALL`
const LABEL_WEIGHTS: [f64; 7] = [0.804, 0.057, 0.057, 0.057, 0.017, 0.004, 0.004];

/// Floor for non-selected class probabilities before normalisation
const MIN_PROBABILITY: f64 = 0.01;

pub struct SyntheticSource {
    rng: StdRng,
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticSource {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for tests
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Weighted random label
    fn pick_label(&mut self) -> ThreatLabel {
        let roll: f64 = self.rng.gen();
        let mut cumulative = 0.0;
        for (label, weight) in ThreatLabel::ALL.iter().zip(LABEL_WEIGHTS) {
            cumulative += weight;
            if roll <= cumulative {
                return *label;
            }
        }
        ThreatLabel::Benign
    }

    /// Build one synthetic event
    pub fn generate(&mut self) -> ClassificationEvent {
        let label = self.pick_label();

        // Confidence 75-99% - the model is usually pretty sure
        let raw_confidence: f64 = self.rng.gen_range(0.75..0.99);

        // Selected class gets the confidence, the rest share what's left
        let others = (ThreatLabel::ALL.len() - 1) as f64;
        let remaining = 1.0 - raw_confidence;
        let mut probabilities: BTreeMap<String, f64> = ThreatLabel::ALL
            .iter()
            .map(|l| {
                let p = if *l == label {
                    raw_confidence
                } else {
                    (remaining / others * self.rng.gen_range(0.5..1.5)).max(MIN_PROBABILITY)
                };
                (l.as_str().to_string(), p)
            })
            .collect();

        let total: f64 = probabilities.values().sum();
        for p in probabilities.values_mut() {
            *p /= total;
        }

        let confidence = probabilities
            .get(label.as_str())
            .copied()
            .unwrap_or(raw_confidence);

        let features = (0..FEATURE_COUNT)
            .map(|_| self.rng.gen_range(-2.0..2.0))
            .collect();

        let now = Utc::now();
        ClassificationEvent {
            id: EventId::generate(now),
            timestamp: now,
            label: label.as_str().to_string(),
            confidence,
            class_probabilities: probabilities,
            features,
        }
    }
}

impl EventSource for SyntheticSource {
    async fn fetch_next(&mut self) -> DashboardResult<ClassificationEvent> {
        Ok(self.generate())
    }
}
