use crate::types::{RiskTier, StatusTier};
use serde::Serialize;

const CRITICAL_THRESHOLD: f64 = 75.0;
const HIGH_THRESHOLD: f64 = 50.0;
const MEDIUM_THRESHOLD: f64 = 25.0;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct RiskClassification {
    pub tier: RiskTier,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct StatusClassification {
    pub tier: StatusTier,
    pub label: &'static str,
}

fn bucket(score: f64) -> RiskTier {
    if score >= CRITICAL_THRESHOLD {
        RiskTier::Critical
    } else if score >= HIGH_THRESHOLD {
        RiskTier::High
    } else if score >= MEDIUM_THRESHOLD {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

/// Buckets a 0-100 risk score. Scores outside the range fall into the nearest
/// bucket; a missing score is `Unknown`.
pub fn classify_risk(score: Option<f64>) -> RiskClassification {
    let tier = score.map(bucket).unwrap_or(RiskTier::Unknown);
    RiskClassification {
        tier,
        label: tier.label(),
    }
}

pub fn classify_status(has_static: bool, has_dynamic: bool) -> StatusClassification {
    let tier = match (has_static, has_dynamic) {
        (true, true) => StatusTier::Complete,
        (true, false) | (false, true) => StatusTier::Partial,
        (false, false) => StatusTier::Pending,
    };
    StatusClassification {
        tier,
        label: tier.label(),
    }
}
