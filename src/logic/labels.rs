//! Threat Labels
//!
//! Fixed class label set shared with the classification model.
//! KHÔNG đổi tên wire - must match the model output exactly.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DashboardError;

// ============================================================================
// LABEL SET
// ============================================================================

/// Traffic classes emitted by the model, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ThreatLabel {
    /// Normal traffic
    #[serde(rename = "BENIGN")]
    Benign,
    #[serde(rename = "Port Scan")]
    PortScan,
    #[serde(rename = "DDoS")]
    DDoS,
    #[serde(rename = "DoS")]
    DoS,
    #[serde(rename = "Bot")]
    Bot,
    #[serde(rename = "Brute Force")]
    BruteForce,
    #[serde(rename = "Web Attack")]
    WebAttack,
}

impl ThreatLabel {
    /// All labels in display order
    pub const ALL: [ThreatLabel; 7] = [
        ThreatLabel::Benign,
        ThreatLabel::PortScan,
        ThreatLabel::DDoS,
        ThreatLabel::DoS,
        ThreatLabel::Bot,
        ThreatLabel::BruteForce,
        ThreatLabel::WebAttack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatLabel::Benign => "BENIGN",
            ThreatLabel::PortScan => "Port Scan",
            ThreatLabel::DDoS => "DDoS",
            ThreatLabel::DoS => "DoS",
            ThreatLabel::Bot => "Bot",
            ThreatLabel::BruteForce => "Brute Force",
            ThreatLabel::WebAttack => "Web Attack",
        }
    }

    pub fn is_threat(&self) -> bool {
        !matches!(self, ThreatLabel::Benign)
    }

    pub fn color(&self) -> &'static str {
        match self {
            ThreatLabel::Benign => "#10b981",     // Green
            ThreatLabel::PortScan => "#f43f5e",   // Red
            ThreatLabel::DDoS => "#f97316",       // Orange
            ThreatLabel::DoS => "#a855f7",        // Purple
            ThreatLabel::Bot => "#06b6d4",        // Cyan
            ThreatLabel::BruteForce => "#ec4899", // Pink
            ThreatLabel::WebAttack => "#eab308",  // Yellow
        }
    }
}

impl std::fmt::Display for ThreatLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ThreatLabel {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ThreatLabel::ALL
            .iter()
            .copied()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| DashboardError::MalformedEvent(format!("unknown label '{}'", s)))
    }
}
