//! Rolling Time Series
//!
//! Fixed-size window of per-event class occurrence buckets, oldest first.
//!
//! Each applied event opens its own bucket, even when several events land in
//! the same second. Buckets are NOT merged by time label. Charts that want a
//! smoother line use `downsample`.

use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};

use crate::logic::labels::ThreatLabel;

/// One slot of the timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesBucket {
    /// Wall clock `HH:MM:SS` (UTC)
    pub time: String,
    pub timestamp: DateTime<Utc>,
    pub counts: BTreeMap<ThreatLabel, u64>,
}

impl SeriesBucket {
    /// Bucket for a single event: every label 0 except `label`
    pub fn for_event(label: ThreatLabel, now: DateTime<Utc>) -> Self {
        let mut counts: BTreeMap<ThreatLabel, u64> =
            ThreatLabel::ALL.iter().map(|l| (*l, 0)).collect();
        counts.insert(label, 1);

        Self {
            time: time_label(now),
            timestamp: now,
            counts,
        }
    }

    pub fn get(&self, label: ThreatLabel) -> u64 {
        self.counts.get(&label).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

/// Bucket label: wall clock truncated to seconds
pub fn time_label(now: DateTime<Utc>) -> String {
    now.trunc_subsecs(0).format("%H:%M:%S").to_string()
}

#[derive(Debug, Clone)]
pub struct TimeSeries {
    buckets: VecDeque<SeriesBucket>,
    capacity: usize,
}

impl TimeSeries {
    pub fn new(capacity: usize) -> Self {
        Self {
            buckets: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a new bucket for `label`, dropping from the front beyond capacity
    pub fn record(&mut self, label: ThreatLabel, now: DateTime<Utc>) {
        self.buckets.push_back(SeriesBucket::for_event(label, now));
        while self.buckets.len() > self.capacity {
            self.buckets.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeriesBucket> {
        self.buckets.iter()
    }

    pub fn to_vec(&self) -> Vec<SeriesBucket> {
        self.buckets.iter().cloned().collect()
    }

    /// Sum every `group` consecutive buckets into one, keeping the first
    /// bucket's time label. A trailing partial group is kept as is.
    pub fn downsample(&self, group: usize) -> Vec<SeriesBucket> {
        if group <= 1 {
            return self.to_vec();
        }

        let mut out: Vec<SeriesBucket> = Vec::with_capacity(self.buckets.len() / group + 1);
        for (i, bucket) in self.buckets.iter().enumerate() {
            if i % group == 0 {
                out.push(bucket.clone());
                continue;
            }
            if let Some(acc) = out.last_mut() {
                for (label, count) in &bucket.counts {
                    *acc.counts.entry(*label).or_insert(0) += count;
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64, millis: u32) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, millis * 1_000_000).unwrap()
    }

    #[test]
    fn test_time_label_truncates() {
        // 2024-12-28T15:33:20.999Z
        assert_eq!(time_label(at(1_735_400_000, 999)), "15:33:20");
    }

    #[test]
    fn test_same_second_not_merged() {
        let mut series = TimeSeries::new(50);
        series.record(ThreatLabel::Benign, at(100, 0));
        series.record(ThreatLabel::Bot, at(100, 500));

        assert_eq!(series.len(), 2);
        let buckets = series.to_vec();
        assert_eq!(buckets[0].time, buckets[1].time);
        assert_eq!(buckets[0].get(ThreatLabel::Benign), 1);
        assert_eq!(buckets[1].get(ThreatLabel::Bot), 1);
        assert_eq!(buckets[1].total(), 1);
    }

    #[test]
    fn test_drops_oldest() {
        let mut series = TimeSeries::new(2);
        series.record(ThreatLabel::Benign, at(1, 0));
        series.record(ThreatLabel::DDoS, at(2, 0));
        series.record(ThreatLabel::DoS, at(3, 0));

        let buckets = series.to_vec();
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].get(ThreatLabel::DDoS), 1);
        assert_eq!(buckets[1].get(ThreatLabel::DoS), 1);
    }

    #[test]
    fn test_downsample_groups_of_three() {
        let mut series = TimeSeries::new(50);
        let labels = [
            ThreatLabel::Benign,
            ThreatLabel::Benign,
            ThreatLabel::Bot,
            ThreatLabel::DoS,
            ThreatLabel::Benign,
        ];
        for (i, label) in labels.iter().enumerate() {
            series.record(*label, at(i as i64, 0));
        }

        let grouped = series.downsample(3);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].time, time_label(at(0, 0)));
        assert_eq!(grouped[0].get(ThreatLabel::Benign), 2);
        assert_eq!(grouped[0].get(ThreatLabel::Bot), 1);
        assert_eq!(grouped[1].total(), 2);
    }
}
