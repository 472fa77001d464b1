//! Pipeline configuration.
//!
//! `SlaConfig::default()` matches the helpdesk sheet the dashboard was built
//! for: Thai column headers, the two closed statuses, and a five minute
//! cache. A JSON file may override any subset of fields.

use crate::types::UNSPECIFIED;
use serde::{Deserialize, Serialize};

/// Day/month/two-digit-year with 24-hour time, e.g. `05/03/24 14:30:00`.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%d/%m/%y %H:%M:%S";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColumnNames {
    pub ticket_id:    String,
    pub received_at:  String,
    pub closed_at:    String,
    pub status:       String,
    pub department:   String,
    pub category:     String,
    pub sub_category: String,
    pub sla:          String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            ticket_id:    "หมายเลข Case".into(),
            received_at:  "วัน / เวลา (รับเรื่องร้องขอ)".into(),
            closed_at:    "วัน / เวลา (ปิดเคส)".into(),
            status:       "สถานะ".into(),
            department:   "แผนก".into(),
            category:     "Category".into(),
            sub_category: "Sub Category".into(),
            sla:          "SLA".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SlaConfig {
    pub columns:            ColumnNames,
    /// Status strings that mark a ticket as closed. Exact match.
    pub closed_statuses:    Vec<String>,
    /// Filled into missing department / status / category / sub-category.
    pub unspecified:        String,
    pub timestamp_format:   String,
    pub cache_ttl_secs:     u64,
    pub fetch_timeout_secs: u64,
}

impl Default for SlaConfig {
    fn default() -> Self {
        Self {
            columns:            ColumnNames::default(),
            closed_statuses:    vec!["ปิด Case".into(), "เสร็จสิ้น".into()],
            unspecified:        UNSPECIFIED.into(),
            timestamp_format:   DEFAULT_TIMESTAMP_FORMAT.into(),
            cache_ttl_secs:     300,
            fetch_timeout_secs: 30,
        }
    }
}

impl SlaConfig {
    /// Load from a JSON file. Missing fields fall back to the defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        Self::from_json(&content).map_err(|e| anyhow::anyhow!("Invalid config {path}: {e}"))
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let config: SlaConfig = serde_json::from_str(content)?;
        if config.closed_statuses.is_empty() {
            log::warn!("config has no closed statuses; every ticket will be treated as open");
        }
        Ok(config)
    }

    pub fn is_closed_status(&self, status: &str) -> bool {
        self.closed_statuses.iter().any(|s| s == status)
    }
}
