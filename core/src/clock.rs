//! Reference clock: supplies the single "now" for one pipeline run.
//!
//! RULE: The pipeline never reads the system time itself. Callers take one
//! reading from a ReportClock and pass it down, so every open ticket in a
//! batch is measured against the same instant.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "mode", content = "at", rename_all = "snake_case")]
pub enum ReportClock {
    /// Local wall-clock time, matching the naive timestamps in the source.
    #[default]
    System,
    /// Pinned instant, for reproducible reports and tests.
    Fixed(NaiveDateTime),
}

impl ReportClock {
    pub fn now(&self) -> NaiveDateTime {
        match self {
            ReportClock::System   => Local::now().naive_local(),
            ReportClock::Fixed(t) => *t,
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, ReportClock::Fixed(_))
    }
}
