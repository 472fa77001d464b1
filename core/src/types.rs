//! Shared primitive types and sentinel values used across the pipeline.

/// An SLA budget or a whole-minute duration.
pub type Minutes = u32;

/// The ticket identifier as it appears in the source.
pub type TicketId = String;

/// Filled into any missing categorical field ("unspecified").
pub const UNSPECIFIED: &str = "ไม่ระบุ";

/// Budget assigned when the SLA text is absent or unparseable.
pub const ZERO_BUDGET: Minutes = 0;

pub const MINUTES_PER_HOUR: Minutes = 60;
pub const MINUTES_PER_DAY: Minutes = 24 * MINUTES_PER_HOUR;
