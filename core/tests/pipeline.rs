//! Normalizer / orchestrator tests against the helpdesk fixture.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use sladesk_core::{
    compliance::ComplianceLabel,
    config::{ColumnNames, SlaConfig},
    error::SlaError,
    pipeline::{prepare, Dataset},
    source::{read_csv, RawTable},
    ticket::{DecoratedTicket, Lifecycle},
    types::UNSPECIFIED,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

const FIXTURE: &str = include_str!("fixtures/tickets.csv");

fn reference_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 10)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn fixture_dataset() -> Dataset {
    let _ = env_logger::builder().is_test(true).try_init();
    let raw = read_csv(FIXTURE.as_bytes()).expect("fixture parses");
    prepare(raw, reference_now(), &SlaConfig::default()).expect("fixture prepares")
}

fn find<'a>(dataset: &'a Dataset, id: &str) -> &'a DecoratedTicket {
    dataset
        .tickets
        .iter()
        .find(|t| t.record.ticket_id == id)
        .unwrap_or_else(|| panic!("ticket {id} missing"))
}

/// English headers and statuses, for the worked scenarios.
fn english_config() -> SlaConfig {
    SlaConfig {
        columns: ColumnNames {
            ticket_id: "id".into(),
            received_at: "received".into(),
            closed_at: "closed".into(),
            status: "status".into(),
            department: "department".into(),
            category: "category".into(),
            sub_category: "sub_category".into(),
            sla: "sla".into(),
        },
        closed_statuses: vec!["closed".into(), "completed".into()],
        ..SlaConfig::default()
    }
}

fn english_table(rows: Vec<Vec<&str>>) -> RawTable {
    let headers = ["id", "received", "closed", "status", "department", "category", "sub_category", "sla"];
    RawTable::new(
        headers.iter().map(|h| h.to_string()).collect(),
        rows.into_iter()
            .map(|r| r.into_iter().map(String::from).collect())
            .collect(),
    )
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn every_row_survives_normalization() {
    let dataset = fixture_dataset();
    assert_eq!(dataset.len(), 7);
    assert_eq!(dataset.stats.rows, 7);
    assert_eq!(dataset.reference_now, reference_now());
}

/// Column names with stray whitespace (" สถานะ ", "แผนก ") still resolve.
#[test]
fn padded_headers_are_trimmed() {
    let dataset = fixture_dataset();
    let t = find(&dataset, "C001");
    assert_eq!(t.record.status, "ปิด Case");
    assert_eq!(t.record.department, "IT");
}

#[test]
fn fixture_rows_classify_as_expected() {
    let dataset = fixture_dataset();
    let expected = [
        ("C001", 120, 60.0, ComplianceLabel::WithinSla),
        ("C002", 240, 1440.0, ComplianceLabel::BreachedClosed),
        ("C003", 1440, 120.0, ComplianceLabel::Normal),
        ("C004", 210, 180.0, ComplianceLabel::Warning),
        ("C005", 120, 1440.0, ComplianceLabel::BreachedOpen),
        ("C006", 0, 0.0, ComplianceLabel::Normal),
        ("C007", 0, 30.0, ComplianceLabel::BreachedClosed),
    ];
    for (id, budget, elapsed, label) in expected {
        let t = find(&dataset, id);
        assert_eq!(t.budget_minutes, budget, "{id} budget");
        assert_eq!(t.elapsed_minutes, elapsed, "{id} elapsed");
        assert_eq!(t.label, label, "{id} label");
    }
}

#[test]
fn missing_categoricals_get_the_sentinel() {
    let dataset = fixture_dataset();

    let c005 = find(&dataset, "C005");
    assert_eq!(c005.record.department, UNSPECIFIED);

    let c006 = find(&dataset, "C006");
    assert_eq!(c006.record.status, UNSPECIFIED);
    assert_eq!(c006.record.category, UNSPECIFIED);
    assert_eq!(c006.record.sub_category, UNSPECIFIED);
    assert_eq!(c006.record.lifecycle, Lifecycle::Open, "sentinel status is treated as open");

    assert_eq!(dataset.stats.unspecified_filled, 4);
}

#[test]
fn unparseable_timestamp_becomes_missing() {
    let dataset = fixture_dataset();
    let c006 = find(&dataset, "C006");
    assert_eq!(c006.record.received_at, None);
    assert_eq!(c006.record.received_raw.as_deref(), Some("not-a-date"));
    assert_eq!(dataset.stats.unparseable_received, 1);
    assert_eq!(dataset.stats.missing_received, 0);
}

#[test]
fn zero_budgets_are_counted_and_kept_distinct() {
    let dataset = fixture_dataset();
    assert_eq!(dataset.stats.zero_budget, 2);
    let c007 = find(&dataset, "C007");
    assert_eq!(c007.budget_minutes, 0);
    assert_eq!(c007.budget_ratio(), None);
    assert_eq!(c007.label, ComplianceLabel::BreachedClosed);
}

#[test]
fn missing_sla_column_fails_the_batch() {
    let raw = RawTable::new(
        vec!["วัน / เวลา (รับเรื่องร้องขอ)".into(), "สถานะ".into()],
        vec![vec!["01/03/24 09:00:00".into(), "ปิด Case".into()]],
    );
    let err = prepare(raw, reference_now(), &SlaConfig::default()).unwrap_err();
    assert!(
        matches!(&err, SlaError::MissingColumn { column } if column == "SLA"),
        "unexpected error: {err}"
    );
}

#[test]
fn missing_received_column_fails_the_batch() {
    let raw = RawTable::new(vec!["SLA".into()], vec![vec!["1 วัน".into()]]);
    let err = prepare(raw, reference_now(), &SlaConfig::default()).unwrap_err();
    assert!(matches!(err, SlaError::MissingColumn { .. }));
}

/// Optional columns may be absent entirely; every row then takes defaults.
#[test]
fn absent_optional_columns_default_every_row() {
    let raw = RawTable::new(
        vec!["วัน / เวลา (รับเรื่องร้องขอ)".into(), "SLA".into()],
        vec![
            vec!["10/03/24 11:00:00".into(), "2 ชั่วโมง".into()],
            vec!["10/03/24 11:30:00".into()],
        ],
    );
    let dataset = prepare(raw, reference_now(), &SlaConfig::default()).unwrap();

    assert_eq!(dataset.tickets[0].record.ticket_id, "row-1");
    assert_eq!(dataset.tickets[0].record.status, UNSPECIFIED);
    assert_eq!(dataset.tickets[0].record.closed_at, None);
    assert_eq!(dataset.tickets[0].label, ComplianceLabel::Normal);

    // Short row: the SLA cell is missing, so the budget is zero and the
    // 30 open minutes breach it.
    assert_eq!(dataset.tickets[1].budget_minutes, 0);
    assert_eq!(dataset.tickets[1].label, ComplianceLabel::BreachedOpen);
    assert_eq!(dataset.stats.unspecified_filled, 8);
}

#[test]
fn empty_table_prepares_to_empty_dataset() {
    let raw = read_csv("วัน / เวลา (รับเรื่องร้องขอ),SLA\n".as_bytes()).unwrap();
    let dataset = prepare(raw, reference_now(), &SlaConfig::default()).unwrap();
    assert!(dataset.is_empty());
}

/// completed, 00:00 → 02:00 against a one-hour budget.
#[test]
fn completed_two_hours_against_one_hour_breaches() {
    let raw = english_table(vec![vec![
        "T1", "01/01/24 00:00:00", "01/01/24 02:00:00", "completed", "IT", "Hardware", "Printer", "1 ชั่วโมง",
    ]]);
    let dataset = prepare(raw, reference_now(), &english_config()).unwrap();
    let t = &dataset.tickets[0];
    assert_eq!(t.budget_minutes, 60);
    assert_eq!(t.elapsed_minutes, 120.0);
    assert_eq!(t.label, ComplianceLabel::BreachedClosed);
}

/// in progress, received 100 minutes before now, two-hour budget.
#[test]
fn in_progress_at_83_percent_warns() {
    let now = reference_now();
    let received = (now - TimeDelta::minutes(100)).format("%d/%m/%y %H:%M:%S").to_string();
    let raw = english_table(vec![vec![
        "T2", received.as_str(), "", "in progress", "IT", "Network", "VPN", "2 ชั่วโมง",
    ]]);
    let dataset = prepare(raw, now, &english_config()).unwrap();
    let t = &dataset.tickets[0];
    assert_eq!(t.budget_minutes, 120);
    assert_eq!(t.elapsed_minutes, 100.0);
    assert_eq!(t.label, ComplianceLabel::Warning);
}

/// Only exact status strings close a ticket.
#[test]
fn closed_status_match_is_exact() {
    let raw = english_table(vec![vec![
        "T3", "01/01/24 00:00:00", "01/01/24 00:30:00", "Completed", "IT", "a", "b", "1 hour",
    ]]);
    let dataset = prepare(raw, reference_now(), &english_config()).unwrap();
    assert_eq!(dataset.tickets[0].record.lifecycle, Lifecycle::Open);
    assert_eq!(dataset.tickets[0].label, ComplianceLabel::BreachedOpen);
}

/// A department of "N/A" gets the sentinel like an empty cell does.
#[test]
fn missing_value_markers_get_the_sentinel() {
    let raw = english_table(vec![vec![
        "T4", "01/01/24 00:00:00", "NULL", "closed", "N/A", "NA", "nan", "1 hour",
    ]]);
    let dataset = prepare(raw, reference_now(), &english_config()).unwrap();
    let t = &dataset.tickets[0];
    assert_eq!(t.record.department, UNSPECIFIED);
    assert_eq!(t.record.category, UNSPECIFIED);
    assert_eq!(t.record.sub_category, UNSPECIFIED);
    assert_eq!(t.record.closed_at, None);
    assert_eq!(dataset.stats.unparseable_closed, 0, "a marker is missing, not malformed");
    assert_eq!(dataset.stats.unspecified_filled, 3);
}
