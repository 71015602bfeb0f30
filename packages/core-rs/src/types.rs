use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RiskTier {
    Critical,
    High,
    Medium,
    Low,
    Unknown,
}

impl RiskTier {
    pub fn label(self) -> &'static str {
        match self {
            RiskTier::Critical => "Critical",
            RiskTier::High => "High",
            RiskTier::Medium => "Medium",
            RiskTier::Low => "Low",
            RiskTier::Unknown => "Unknown",
        }
    }

    /// Presentation token for sinks that style by tier.
    pub fn style_token(self) -> &'static str {
        match self {
            RiskTier::Critical => "risk-critical",
            RiskTier::High => "risk-high",
            RiskTier::Medium => "risk-medium",
            RiskTier::Low => "risk-low",
            RiskTier::Unknown => "risk-unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StatusTier {
    Complete,
    Partial,
    Pending,
}

impl StatusTier {
    pub fn label(self) -> &'static str {
        match self {
            StatusTier::Complete => "Complete",
            StatusTier::Partial => "Partial",
            StatusTier::Pending => "Pending",
        }
    }

    pub fn style_token(self) -> &'static str {
        match self {
            StatusTier::Complete => "status-complete",
            StatusTier::Partial => "status-partial",
            StatusTier::Pending => "status-pending",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskAssessment {
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub factors: Vec<String>,
}

/// Wire shape of one entry in the `files` map. The map key is folded in as `id`.
#[derive(Debug, Clone, Deserialize)]
pub struct FileRecordPayload {
    pub filename: String,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub upload_time: String,
    #[serde(default)]
    pub has_static_analysis: bool,
    #[serde(default)]
    pub has_dynamic_analysis: bool,
    #[serde(default)]
    pub risk_assessment: Option<RiskAssessment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileRecord {
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub upload_time: String,
    #[serde(default)]
    pub has_static_analysis: bool,
    #[serde(default)]
    pub has_dynamic_analysis: bool,
    #[serde(default)]
    pub risk_assessment: Option<RiskAssessment>,
}

impl FileRecord {
    pub fn from_payload(id: impl Into<String>, payload: FileRecordPayload) -> Self {
        Self {
            id: id.into(),
            filename: payload.filename,
            file_size: payload.file_size,
            upload_time: payload.upload_time,
            has_static_analysis: payload.has_static_analysis,
            has_dynamic_analysis: payload.has_dynamic_analysis,
            risk_assessment: payload.risk_assessment,
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.file_size.unwrap_or(0)
    }

    pub fn risk_score(&self) -> Option<f64> {
        self.risk_assessment.as_ref().and_then(|risk| risk.score)
    }

    /// Upload instant, or `None` when the timestamp does not parse.
    pub fn uploaded_at(&self) -> Option<DateTime<Utc>> {
        parse_upload_time(&self.upload_time)
    }
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

pub fn parse_upload_time(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed.and_utc());
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|parsed| parsed.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_common_upload_time_shapes() {
        let rfc = parse_upload_time("2024-03-01T10:15:00Z").unwrap();
        assert_eq!(rfc.hour(), 10);

        let spaced = parse_upload_time("2024-03-01 10:15:30.250").unwrap();
        assert_eq!(spaced.minute(), 15);

        let date_only = parse_upload_time("2024-03-01").unwrap();
        assert_eq!(date_only.day(), 1);
    }

    #[test]
    fn unparseable_upload_time_is_none() {
        assert!(parse_upload_time("").is_none());
        assert!(parse_upload_time("yesterday").is_none());
    }

    #[test]
    fn payload_defaults_missing_optional_fields() {
        let payload: FileRecordPayload =
            serde_json::from_str(r#"{"filename":"a.bin"}"#).unwrap();
        let record = FileRecord::from_payload("abc", payload);

        assert_eq!(record.id, "abc");
        assert_eq!(record.size_bytes(), 0);
        assert!(!record.has_static_analysis);
        assert!(record.risk_score().is_none());
    }
}
