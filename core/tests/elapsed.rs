//! Elapsed-time calculator tests.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use sladesk_core::{
    elapsed::elapsed_minutes,
    ticket::{Lifecycle, TicketRecord},
    types::UNSPECIFIED,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn ticket(
    lifecycle: Lifecycle,
    received_at: Option<NaiveDateTime>,
    closed_at: Option<NaiveDateTime>,
) -> TicketRecord {
    TicketRecord {
        ticket_id: "T-1".into(),
        received_at,
        closed_at,
        status: UNSPECIFIED.into(),
        lifecycle,
        department: UNSPECIFIED.into(),
        category: UNSPECIFIED.into(),
        sub_category: UNSPECIFIED.into(),
        sla_spec: None,
        received_raw: None,
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn closed_ticket_measures_received_to_closed() {
    let t = ticket(Lifecycle::Closed, Some(at(1, 0, 0)), Some(at(1, 2, 0)));
    // The reference instant is irrelevant for closed tickets.
    assert_eq!(elapsed_minutes(&t, at(20, 0, 0)), 120.0);
}

#[test]
fn closed_ticket_missing_either_timestamp_is_zero() {
    let now = at(5, 0, 0);
    let no_close = ticket(Lifecycle::Closed, Some(at(1, 0, 0)), None);
    let no_receive = ticket(Lifecycle::Closed, None, Some(at(1, 2, 0)));
    let neither = ticket(Lifecycle::Closed, None, None);
    assert_eq!(elapsed_minutes(&no_close, now), 0.0);
    assert_eq!(elapsed_minutes(&no_receive, now), 0.0);
    assert_eq!(elapsed_minutes(&neither, now), 0.0);
}

/// Closed before it was received: negative, not clamped.
#[test]
fn closed_ticket_out_of_order_is_negative() {
    let t = ticket(Lifecycle::Closed, Some(at(1, 2, 0)), Some(at(1, 1, 30)));
    assert_eq!(elapsed_minutes(&t, at(5, 0, 0)), -30.0);
}

#[test]
fn open_ticket_measures_against_reference_now() {
    let now = at(3, 12, 0);
    let received = now - TimeDelta::minutes(100);
    let t = ticket(Lifecycle::Open, Some(received), None);
    assert_eq!(elapsed_minutes(&t, now), 100.0);
}

/// A stray closed timestamp on an open ticket is ignored.
#[test]
fn open_ticket_ignores_closed_timestamp() {
    let now = at(3, 0, 0);
    let t = ticket(Lifecycle::Open, Some(at(2, 0, 0)), Some(at(2, 0, 5)));
    assert_eq!(elapsed_minutes(&t, now), 1440.0);
}

#[test]
fn open_ticket_without_received_is_zero() {
    let t = ticket(Lifecycle::Open, None, None);
    assert_eq!(elapsed_minutes(&t, at(3, 0, 0)), 0.0);
}

#[test]
fn sub_minute_precision_is_kept() {
    let now = at(1, 0, 1) + TimeDelta::seconds(30);
    let t = ticket(Lifecycle::Open, Some(at(1, 0, 0)), None);
    assert_eq!(elapsed_minutes(&t, now), 1.5);
}
