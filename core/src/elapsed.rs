//! Elapsed-time calculator.
//!
//! Closed tickets are measured received → closed; everything else is
//! measured received → reference now. A missing timestamp on the path that
//! is needed yields 0.0. The reference instant is passed in by the caller so
//! one batch is measured against a single snapshot.

use crate::ticket::{Lifecycle, TicketRecord};
use chrono::{NaiveDateTime, TimeDelta};

/// Minutes the ticket has consumed as of `reference_now`.
///
/// Out-of-order closed timestamps produce a negative value; this is kept
/// as observed rather than clamped.
pub fn elapsed_minutes(record: &TicketRecord, reference_now: NaiveDateTime) -> f64 {
    match record.lifecycle {
        Lifecycle::Closed => match (record.received_at, record.closed_at) {
            (Some(received), Some(closed)) => delta_minutes(closed - received),
            _ => 0.0,
        },
        Lifecycle::Open => match record.received_at {
            Some(received) => delta_minutes(reference_now - received),
            None => 0.0,
        },
    }
}

fn delta_minutes(delta: TimeDelta) -> f64 {
    delta.num_milliseconds() as f64 / 60_000.0
}
