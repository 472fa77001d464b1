//! Aggregation layer: filters, group counts and KPI totals.
//!
//! Every function here takes an arbitrary subset of decorated tickets and
//! depends on nothing else, so the view layer can narrow the rows however
//! it likes before asking for counts.
//!
//! Ordering of group counts: count descending, then key ascending.

use crate::{
    compliance::ComplianceLabel,
    ticket::DecoratedTicket,
    types::UNSPECIFIED,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ── Group counts ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Department,
    Status,
    /// Category and sub-category together, keyed `"<category> / <sub>"`.
    CategoryPair,
    Compliance,
    ReceivedDate,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Department,
        Dimension::Status,
        Dimension::CategoryPair,
        Dimension::Compliance,
        Dimension::ReceivedDate,
    ];

    /// Group key of one ticket along this dimension. Tickets without a
    /// received date group under the unspecified sentinel.
    pub fn key_of(self, ticket: &DecoratedTicket) -> String {
        let record = &ticket.record;
        match self {
            Dimension::Department   => record.department.clone(),
            Dimension::Status       => record.status.clone(),
            Dimension::CategoryPair => format!("{} / {}", record.category, record.sub_category),
            Dimension::Compliance   => ticket.label.display_text().to_string(),
            Dimension::ReceivedDate => match ticket.received_date() {
                Some(date) => date.format("%Y-%m-%d").to_string(),
                None => UNSPECIFIED.to_string(),
            },
        }
    }
}

/// One output row: the dimension value and how many tickets carry it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupCount {
    pub key:   String,
    pub count: usize,
}

pub fn count_by<'a, I>(tickets: I, dimension: Dimension) -> Vec<GroupCount>
where
    I: IntoIterator<Item = &'a DecoratedTicket>,
{
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for ticket in tickets {
        *counts.entry(dimension.key_of(ticket)).or_default() += 1;
    }

    let mut rows: Vec<GroupCount> = counts
        .into_iter()
        .map(|(key, count)| GroupCount { key, count })
        .collect();
    // Stable sort keeps the BTreeMap's ascending key order among equal counts.
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyCount {
    pub date:  NaiveDate,
    pub count: usize,
}

/// Tickets per received date in chronological order. Tickets without a
/// received date are left out of the trend.
pub fn daily_volume<'a, I>(tickets: I) -> Vec<DailyCount>
where
    I: IntoIterator<Item = &'a DecoratedTicket>,
{
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for date in tickets.into_iter().filter_map(DecoratedTicket::received_date) {
        *counts.entry(date).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect()
}

// ── KPI summary ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Summary {
    pub total:    usize,
    pub closed:   usize,
    pub open:     usize,
    /// Breached while closed plus breached while still open.
    pub breached: usize,
    pub warning:  usize,
}

impl Summary {
    pub fn from_tickets<'a, I>(tickets: I) -> Self
    where
        I: IntoIterator<Item = &'a DecoratedTicket>,
    {
        let mut summary = Summary::default();
        for ticket in tickets {
            summary.total += 1;
            if ticket.record.lifecycle.is_closed() {
                summary.closed += 1;
            }
            if ticket.label.is_breached() {
                summary.breached += 1;
            }
            if ticket.label == ComplianceLabel::Warning {
                summary.warning += 1;
            }
        }
        summary.open = summary.total - summary.closed;
        summary
    }

    /// Breached share of all tickets, 0.0 for an empty subset.
    pub fn breach_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.breached as f64 / self.total as f64
        }
    }
}

// ── Filtering ────────────────────────────────────────────────────────────────

/// Inclusive range of received dates. Deserializing goes through
/// [`DateRange::new`], so `end` may be omitted or come before `start`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "DateBounds")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end:   NaiveDate,
}

#[derive(Deserialize)]
struct DateBounds {
    start: NaiveDate,
    #[serde(default)]
    end:   Option<NaiveDate>,
}

impl From<DateBounds> for DateRange {
    fn from(bounds: DateBounds) -> Self {
        DateRange::new(bounds.start, bounds.end)
    }
}

impl DateRange {
    /// A range with no end covers the start day only. Reversed bounds are
    /// swapped.
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Self {
        let end = end.unwrap_or(start);
        Self {
            start: start.min(end),
            end:   start.max(end),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Narrowing applied by the view layer. Empty sets do not constrain.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TicketFilter {
    pub date_range:  Option<DateRange>,
    pub departments: Vec<String>,
    pub statuses:    Vec<String>,
    pub labels:      Vec<ComplianceLabel>,
}

impl TicketFilter {
    /// Narrow to a single department, as a click on the department chart does.
    pub fn focus_department(mut self, department: impl Into<String>) -> Self {
        self.departments = vec![department.into()];
        self
    }

    /// Without an explicit range, cover every received date present in
    /// `tickets`. Undated tickets then fall outside the filter, as they do
    /// in the dashboard's default view.
    pub fn or_full_span(mut self, tickets: &[DecoratedTicket]) -> Self {
        if self.date_range.is_none() {
            self.date_range = Facets::from_tickets(tickets).date_span();
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.date_range.is_none()
            && self.departments.is_empty()
            && self.statuses.is_empty()
            && self.labels.is_empty()
    }

    /// A date range rejects tickets that have no received date.
    pub fn matches(&self, ticket: &DecoratedTicket) -> bool {
        if let Some(range) = self.date_range {
            match ticket.received_date() {
                Some(date) if range.contains(date) => {}
                _ => return false,
            }
        }
        let record = &ticket.record;
        (self.departments.is_empty() || self.departments.contains(&record.department))
            && (self.statuses.is_empty() || self.statuses.contains(&record.status))
            && (self.labels.is_empty() || self.labels.contains(&ticket.label))
    }

    pub fn apply<'a>(&self, tickets: &'a [DecoratedTicket]) -> Vec<&'a DecoratedTicket> {
        tickets.iter().filter(|t| self.matches(t)).collect()
    }
}

// ── Facets ───────────────────────────────────────────────────────────────────

/// Distinct values present in a subset, used to populate filter choices.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Facets {
    pub departments: Vec<String>,
    pub statuses:    Vec<String>,
    pub labels:      Vec<ComplianceLabel>,
    pub first_date:  Option<NaiveDate>,
    pub last_date:   Option<NaiveDate>,
}

impl Facets {
    pub fn from_tickets<'a, I>(tickets: I) -> Self
    where
        I: IntoIterator<Item = &'a DecoratedTicket>,
    {
        let mut departments = BTreeSet::new();
        let mut statuses = BTreeSet::new();
        let mut labels = BTreeSet::new();
        let mut first_date: Option<NaiveDate> = None;
        let mut last_date: Option<NaiveDate> = None;

        for ticket in tickets {
            departments.insert(ticket.record.department.clone());
            statuses.insert(ticket.record.status.clone());
            labels.insert(ticket.label);
            if let Some(date) = ticket.received_date() {
                first_date = Some(first_date.map_or(date, |d| d.min(date)));
                last_date = Some(last_date.map_or(date, |d| d.max(date)));
            }
        }

        Self {
            departments: departments.into_iter().collect(),
            statuses:    statuses.into_iter().collect(),
            labels:      labels.into_iter().collect(),
            first_date,
            last_date,
        }
    }

    /// The full span of received dates, the default date filter.
    pub fn date_span(&self) -> Option<DateRange> {
        let start = self.first_date?;
        Some(DateRange::new(start, self.last_date))
    }
}
