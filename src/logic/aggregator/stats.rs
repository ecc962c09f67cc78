//! Running Statistics

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::round1;

/// Stats cards: totals, threat ratio (%) and throughput (events/s)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RunningStats {
    pub total: u64,
    pub threat_count: u64,
    /// `threat_count / total * 100`, 1 decimal
    pub threat_ratio: f64,
    /// `total / seconds since session start`, 1 decimal
    pub rate: f64,
}

impl RunningStats {
    pub fn record(&mut self, is_threat: bool, session_start: DateTime<Utc>, now: DateTime<Utc>) {
        self.total += 1;
        if is_threat {
            self.threat_count += 1;
        }

        self.threat_ratio = round1(self.threat_count as f64 / self.total as f64 * 100.0);

        let elapsed = (now - session_start).num_milliseconds() as f64 / 1000.0;
        self.rate = if elapsed > 0.0 {
            round1(self.total as f64 / elapsed)
        } else {
            0.0
        };
    }
}
