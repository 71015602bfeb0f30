use crate::risk::{classify_risk, RiskClassification};
use crate::types::FileRecord;
use serde::Serialize;

const SIZE_UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AverageRisk {
    pub score: f64,
    pub classification: RiskClassification,
}

impl AverageRisk {
    pub fn label(&self) -> String {
        format!("{} Risk", self.classification.label)
    }

    pub fn score_label(&self) -> String {
        format!("Risk Score: {:.1}%", self.score)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardStats {
    pub total_count: usize,
    pub total_bytes: u64,
    pub total_size_label: String,
    pub average_risk: Option<AverageRisk>,
}

impl DashboardStats {
    pub fn risk_label(&self) -> String {
        self.average_risk
            .as_ref()
            .map(AverageRisk::label)
            .unwrap_or_else(|| "-".to_string())
    }

    pub fn risk_score_label(&self) -> String {
        self.average_risk
            .as_ref()
            .map(AverageRisk::score_label)
            .unwrap_or_else(|| "Risk Score: -".to_string())
    }
}

/// Human-readable size in base-1024 units, two decimals with trailing zeros
/// dropped.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", SIZE_UNITS[unit])
}

pub fn compute_stats(records: &[FileRecord]) -> DashboardStats {
    let total_bytes = records
        .iter()
        .fold(0u64, |sum, record| sum.saturating_add(record.size_bytes()));

    let scores: Vec<f64> = records.iter().filter_map(FileRecord::risk_score).collect();
    let average_risk = if scores.is_empty() {
        None
    } else {
        let score = scores.iter().sum::<f64>() / scores.len() as f64;
        Some(AverageRisk {
            score,
            classification: classify_risk(Some(score)),
        })
    };

    DashboardStats {
        total_count: records.len(),
        total_bytes,
        total_size_label: format_file_size(total_bytes),
        average_risk,
    }
}
