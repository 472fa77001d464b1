//! Dataset normalizer and pipeline orchestrator.
//!
//! EXECUTION ORDER (per row, fixed):
//!   1. Normalize: parse timestamps, fill categorical sentinels, resolve lifecycle
//!   2. Duration parser     → budget
//!   3. Elapsed calculator  → elapsed minutes
//!   4. Classifier          → compliance label
//!
//! RULES:
//!   - prepare() is a pure function of (raw table, reference now, config).
//!   - Rows are never dropped. Bad cells fall back to missing / zero / sentinel.
//!   - Only a missing required column fails the whole batch.

use crate::{
    compliance::classify,
    config::SlaConfig,
    duration::parse_duration,
    elapsed::elapsed_minutes,
    error::{SlaError, SlaResult},
    source::RawTable,
    ticket::{DecoratedTicket, Lifecycle, TicketRecord},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Per-run counts of every default the normalizer had to apply.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrepareStats {
    pub rows:                 usize,
    pub missing_received:     usize,
    pub unparseable_received: usize,
    pub unparseable_closed:   usize,
    pub zero_budget:          usize,
    pub unspecified_filled:   usize,
}

/// The decorated dataset for one reporting pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dataset {
    pub reference_now: NaiveDateTime,
    pub tickets:       Vec<DecoratedTicket>,
    pub stats:         PrepareStats,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}

/// Column positions resolved once per table.
struct ColumnMap {
    ticket_id:    Option<usize>,
    received_at:  usize,
    closed_at:    Option<usize>,
    status:       Option<usize>,
    department:   Option<usize>,
    category:     Option<usize>,
    sub_category: Option<usize>,
    sla:          usize,
}

impl ColumnMap {
    fn resolve(table: &RawTable, config: &SlaConfig) -> SlaResult<Self> {
        let names = &config.columns;
        let required = |name: &str| {
            table.column_index(name).ok_or_else(|| SlaError::MissingColumn {
                column: name.to_string(),
            })
        };
        Ok(Self {
            ticket_id:    table.column_index(&names.ticket_id),
            received_at:  required(&names.received_at)?,
            closed_at:    table.column_index(&names.closed_at),
            status:       table.column_index(&names.status),
            department:   table.column_index(&names.department),
            category:     table.column_index(&names.category),
            sub_category: table.column_index(&names.sub_category),
            sla:          required(&names.sla)?,
        })
    }
}

/// Run the full pipeline over `raw`, measuring open tickets against
/// `reference_now`.
pub fn prepare(
    mut raw: RawTable,
    reference_now: NaiveDateTime,
    config: &SlaConfig,
) -> SlaResult<Dataset> {
    raw.trim_headers();
    let columns = ColumnMap::resolve(&raw, config)?;

    let mut stats = PrepareStats {
        rows: raw.len(),
        ..PrepareStats::default()
    };
    let mut tickets = Vec::with_capacity(raw.len());

    for row in 0..raw.len() {
        let record = normalize_row(&raw, row, &columns, config, &mut stats);

        let budget_minutes = parse_duration(record.sla_spec.as_deref());
        if budget_minutes == 0 {
            stats.zero_budget += 1;
        }
        let elapsed = elapsed_minutes(&record, reference_now);
        let label = classify(budget_minutes, elapsed, record.lifecycle);

        tickets.push(DecoratedTicket {
            record,
            budget_minutes,
            elapsed_minutes: elapsed,
            label,
        });
    }

    log::info!(
        "prepared {} tickets (now={reference_now}): received missing={} unparseable={}, \
         closed unparseable={}, zero budget={}, sentinel fills={}",
        stats.rows,
        stats.missing_received,
        stats.unparseable_received,
        stats.unparseable_closed,
        stats.zero_budget,
        stats.unspecified_filled,
    );

    Ok(Dataset {
        reference_now,
        tickets,
        stats,
    })
}

fn normalize_row(
    raw: &RawTable,
    row: usize,
    columns: &ColumnMap,
    config: &SlaConfig,
    stats: &mut PrepareStats,
) -> TicketRecord {
    let cell = move |column: Option<usize>| column.and_then(|c| raw.cell(row, c));

    let received_raw = cell(Some(columns.received_at));
    let received_at = received_raw.and_then(|s| parse_timestamp(s, &config.timestamp_format));
    match (received_raw, received_at) {
        (None, _) => stats.missing_received += 1,
        (Some(text), None) => {
            stats.unparseable_received += 1;
            log::debug!("row {row}: unparseable received timestamp {text:?}");
        }
        _ => {}
    }

    let closed_raw = cell(columns.closed_at);
    let closed_at = closed_raw.and_then(|s| parse_timestamp(s, &config.timestamp_format));
    if let (Some(text), None) = (closed_raw, closed_at) {
        stats.unparseable_closed += 1;
        log::debug!("row {row}: unparseable closed timestamp {text:?}");
    }

    let mut fill = |column: Option<usize>| match cell(column) {
        Some(value) => value.to_string(),
        None => {
            stats.unspecified_filled += 1;
            config.unspecified.clone()
        }
    };
    let status = fill(columns.status);
    let department = fill(columns.department);
    let category = fill(columns.category);
    let sub_category = fill(columns.sub_category);

    let lifecycle = if config.is_closed_status(&status) {
        Lifecycle::Closed
    } else {
        Lifecycle::Open
    };

    let ticket_id = cell(columns.ticket_id)
        .map(str::to_string)
        .unwrap_or_else(|| format!("row-{}", row + 1));

    TicketRecord {
        ticket_id,
        received_at,
        closed_at,
        status,
        lifecycle,
        department,
        category,
        sub_category,
        sla_spec: cell(Some(columns.sla)).map(str::to_string),
        received_raw: received_raw.map(str::to_string),
    }
}

/// Parse one timestamp cell; anything that does not match `format` is
/// treated as missing.
pub fn parse_timestamp(text: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), format).ok()
}
