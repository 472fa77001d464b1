//! Compliance classifier: (budget, elapsed, lifecycle) to a label.
//!
//! Closed tickets are judged once: within budget or breached.
//! Open tickets move NORMAL → WARNING → BREACHED_OPEN as elapsed time grows.
//! The boundary `elapsed == budget` is compliant on both paths.

use crate::{ticket::Lifecycle, types::Minutes};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Share of the budget an open ticket may consume before it is flagged.
pub const WARNING_RATIO: f64 = 0.8;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceLabel {
    WithinSla,
    BreachedClosed,
    BreachedOpen,
    Warning,
    Normal,
}

impl ComplianceLabel {
    pub const ALL: [ComplianceLabel; 5] = [
        ComplianceLabel::WithinSla,
        ComplianceLabel::BreachedClosed,
        ComplianceLabel::BreachedOpen,
        ComplianceLabel::Warning,
        ComplianceLabel::Normal,
    ];

    /// Stable machine code, identical to the serde form.
    pub fn code(self) -> &'static str {
        match self {
            ComplianceLabel::WithinSla      => "within_sla",
            ComplianceLabel::BreachedClosed => "breached_closed",
            ComplianceLabel::BreachedOpen   => "breached_open",
            ComplianceLabel::Warning        => "warning",
            ComplianceLabel::Normal         => "normal",
        }
    }

    /// Text shown by the dashboard.
    pub fn display_text(self) -> &'static str {
        match self {
            ComplianceLabel::WithinSla      => "✅ ภายใน SLA",
            ComplianceLabel::BreachedClosed => "❌ เกิน SLA (ปิดแล้ว)",
            ComplianceLabel::BreachedOpen   => "🔥 เกินกำหนด (รีบปิดด่วน!)",
            ComplianceLabel::Warning        => "⚠️ ใกล้หลุด SLA (เร่งมือ)",
            ComplianceLabel::Normal         => "🟢 ปกติ",
        }
    }

    pub fn is_breached(self) -> bool {
        matches!(self, ComplianceLabel::BreachedClosed | ComplianceLabel::BreachedOpen)
    }
}

impl fmt::Display for ComplianceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_text())
    }
}

impl FromStr for ComplianceLabel {
    type Err = String;

    /// Accepts either the machine code or the display text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|label| label.code().eq_ignore_ascii_case(wanted) || label.display_text() == wanted)
            .ok_or_else(|| format!("Unknown compliance label: {wanted}"))
    }
}

pub fn classify(budget: Minutes, elapsed: f64, lifecycle: Lifecycle) -> ComplianceLabel {
    let budget = f64::from(budget);
    match lifecycle {
        Lifecycle::Closed if elapsed <= budget => ComplianceLabel::WithinSla,
        Lifecycle::Closed => ComplianceLabel::BreachedClosed,
        Lifecycle::Open if elapsed > budget => ComplianceLabel::BreachedOpen,
        Lifecycle::Open if budget > 0.0 && elapsed / budget >= WARNING_RATIO => {
            ComplianceLabel::Warning
        }
        Lifecycle::Open => ComplianceLabel::Normal,
    }
}
