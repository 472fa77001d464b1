//! Ticket records: the typed form of one source row.
//!
//! RULE: Optionality lives in the types. Timestamps are `Option`, and the
//! categorical fields are always filled (with `UNSPECIFIED` when the source
//! had nothing), so no downstream code does get-with-default lookups.

use crate::{
    compliance::ComplianceLabel,
    types::{Minutes, TicketId},
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Whether a ticket's status belongs to the closed (terminal) set.
/// Any status outside the closed set, including the sentinel, is `Open`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    Open,
    Closed,
}

impl Lifecycle {
    pub fn is_closed(self) -> bool {
        matches!(self, Lifecycle::Closed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TicketRecord {
    pub ticket_id:    TicketId,
    pub received_at:  Option<NaiveDateTime>,
    pub closed_at:    Option<NaiveDateTime>,
    /// Status text exactly as it appeared in the source (or the sentinel).
    pub status:       String,
    pub lifecycle:    Lifecycle,
    pub department:   String,
    pub category:     String,
    pub sub_category: String,
    /// Raw SLA text, `None` when the cell was empty.
    pub sla_spec:     Option<String>,
    /// Received timestamp text as it appeared in the source, for display.
    pub received_raw: Option<String>,
}

impl TicketRecord {
    pub fn received_date(&self) -> Option<NaiveDate> {
        self.received_at.map(|dt| dt.date())
    }
}

/// A ticket plus the three derived SLA columns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecoratedTicket {
    #[serde(flatten)]
    pub record:          TicketRecord,
    pub budget_minutes:  Minutes,
    pub elapsed_minutes: f64,
    pub label:           ComplianceLabel,
}

impl DecoratedTicket {
    pub fn received_date(&self) -> Option<NaiveDate> {
        self.record.received_date()
    }

    /// Fraction of the budget consumed; `None` for zero-budget tickets.
    pub fn budget_ratio(&self) -> Option<f64> {
        (self.budget_minutes > 0).then(|| self.elapsed_minutes / f64::from(self.budget_minutes))
    }
}
