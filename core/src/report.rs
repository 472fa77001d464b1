//! Report view: everything the presentation layer needs for one render.
//!
//! A ReportView is derived from a Dataset and a TicketFilter and holds no
//! references back into either, so it can be serialized and handed across
//! a process boundary as-is.

use crate::{
    aggregate::{count_by, daily_volume, DailyCount, Dimension, Facets, GroupCount, Summary, TicketFilter},
    pipeline::{Dataset, PrepareStats},
    ticket::DecoratedTicket,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportView {
    pub reference_now: NaiveDateTime,
    pub filter:        TicketFilter,
    pub summary:       Summary,
    pub aggregates:    BTreeMap<Dimension, Vec<GroupCount>>,
    pub daily_volume:  Vec<DailyCount>,
    /// Choices for the filter controls, taken from the date-filtered rows.
    pub facets:        Facets,
    pub stats:         PrepareStats,
    pub tickets:       Vec<DecoratedTicket>,
    /// Set when the dataset is a cached copy served after a failed refresh.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning:       Option<String>,
}

impl ReportView {
    pub fn build(dataset: &Dataset, filter: &TicketFilter) -> Self {
        let subset = filter.apply(&dataset.tickets);

        let date_only = TicketFilter {
            date_range: filter.date_range,
            ..TicketFilter::default()
        };
        let facets = Facets::from_tickets(date_only.apply(&dataset.tickets));

        let aggregates = Dimension::ALL
            .into_iter()
            .map(|dim| (dim, count_by(subset.iter().copied(), dim)))
            .collect();

        Self {
            reference_now: dataset.reference_now,
            filter:        filter.clone(),
            summary:       Summary::from_tickets(subset.iter().copied()),
            aggregates,
            daily_volume:  daily_volume(subset.iter().copied()),
            facets,
            stats:         dataset.stats.clone(),
            tickets:       subset.into_iter().cloned().collect(),
            warning:       None,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = Some(warning.into());
        self
    }

    pub fn counts(&self, dimension: Dimension) -> &[GroupCount] {
        self.aggregates
            .get(&dimension)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
