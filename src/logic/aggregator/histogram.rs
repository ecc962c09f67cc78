//! Class Histogram
//!
//! Running count per label. Every label is present from session start so
//! charts always render a stable class set.

use serde::Serialize;
use std::collections::BTreeMap;

use super::round1;
use crate::logic::labels::ThreatLabel;

#[derive(Debug, Clone)]
pub struct ClassHistogram {
    counts: BTreeMap<ThreatLabel, u64>,
}

impl Default for ClassHistogram {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassHistogram {
    pub fn new() -> Self {
        Self {
            counts: ThreatLabel::ALL.iter().map(|l| (*l, 0)).collect(),
        }
    }

    pub fn increment(&mut self, label: ThreatLabel) {
        *self.counts.entry(label).or_insert(0) += 1;
    }

    pub fn get(&self, label: ThreatLabel) -> u64 {
        self.counts.get(&label).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn counts(&self) -> &BTreeMap<ThreatLabel, u64> {
        &self.counts
    }

    /// Pie chart view: non-zero slices with percentages, plus benign/threat split
    pub fn distribution(&self) -> Distribution {
        let total = self.total();
        let slices = self
            .counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(label, count)| DistributionSlice {
                label: *label,
                count: *count,
                percentage: round1(*count as f64 / total as f64 * 100.0),
                color: label.color(),
            })
            .collect();

        let benign = self.get(ThreatLabel::Benign);
        Distribution {
            total,
            benign,
            threats: total - benign,
            slices,
        }
    }
}

/// One pie slice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSlice {
    pub label: ThreatLabel,
    pub count: u64,
    pub percentage: f64,
    pub color: &'static str,
}

/// Distribution summary for the donut chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub total: u64,
    pub benign: u64,
    pub threats: u64,
    pub slices: Vec<DistributionSlice>,
}
