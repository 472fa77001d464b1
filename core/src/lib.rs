//! sladesk-core: SLA compliance pipeline for helpdesk ticket exports.
//!
//! raw rows → pipeline (duration, elapsed, compliance per row)
//!          → decorated dataset → aggregate / report view

pub mod aggregate;
pub mod cache;
pub mod clock;
pub mod compliance;
pub mod config;
pub mod duration;
pub mod elapsed;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod source;
pub mod ticket;
pub mod types;

pub use compliance::{classify, ComplianceLabel};
pub use duration::parse_duration;
pub use elapsed::elapsed_minutes;
pub use error::{SlaError, SlaResult};
pub use pipeline::{prepare, Dataset};
