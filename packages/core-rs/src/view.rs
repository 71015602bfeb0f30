use crate::client::file_info_path;
use crate::risk::{classify_risk, classify_status, StatusClassification};
use crate::stats::{format_file_size, DashboardStats};
use crate::types::{FileRecord, RiskTier};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RiskBadge {
    pub label: String,
    pub tier: RiskTier,
    /// First risk factor, empty when none is reported.
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FileRow {
    pub id: String,
    pub name: String,
    pub risk: RiskBadge,
    pub size_label: String,
    pub upload_time: String,
    pub status: StatusClassification,
    pub view_path: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardView {
    pub rows: Vec<FileRow>,
    pub stats: DashboardStats,
    pub is_empty: bool,
}

pub trait RenderSink {
    fn render(&mut self, view: &DashboardView);
}

fn risk_badge(record: &FileRecord) -> RiskBadge {
    match &record.risk_assessment {
        Some(risk) => {
            let score = risk.score.unwrap_or(0.0);
            RiskBadge {
                label: format!("{} ({score}%)", risk.level),
                tier: classify_risk(Some(score)).tier,
                detail: risk.factors.first().cloned().unwrap_or_default(),
            }
        }
        None => RiskBadge {
            label: RiskTier::Unknown.label().to_string(),
            tier: RiskTier::Unknown,
            detail: String::new(),
        },
    }
}

impl FileRow {
    pub fn from_record(record: &FileRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.filename.clone(),
            risk: risk_badge(record),
            size_label: format_file_size(record.size_bytes()),
            upload_time: record.upload_time.clone(),
            status: classify_status(record.has_static_analysis, record.has_dynamic_analysis),
            view_path: file_info_path(&record.id),
        }
    }
}

impl DashboardView {
    pub fn build(visible: &[&FileRecord], stats: DashboardStats) -> Self {
        let rows: Vec<FileRow> = visible.iter().map(|record| FileRow::from_record(record)).collect();
        Self {
            is_empty: rows.is_empty(),
            rows,
            stats,
        }
    }
}
