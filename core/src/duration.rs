//! Duration parser: free-text SLA target to a minutes budget.
//!
//! The grammar is a flat scan: every `<integer><unit>` occurrence counts,
//! repeated units are summed, and anything else in the text is ignored.
//! Text with no recognizable unit yields ZERO_BUDGET rather than an error.
//! Counts may use Thai, fullwidth and a few other decimal scripts, mixed
//! freely with ASCII digits.

use crate::types::{Minutes, MINUTES_PER_DAY, MINUTES_PER_HOUR, ZERO_BUDGET};
use regex::Regex;
use std::sync::LazyLock;

static DAY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| unit_pattern(r"วัน|days?\b"));
static HOUR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| unit_pattern(r"ชั่วโมง|hours?\b|hrs?\b"));
static MINUTE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| unit_pattern(r"นาที|minutes?\b|mins?\b"));

/// Code points of `0` in each decimal script a count may be written in.
/// The nine that follow each one are contiguous.
const DIGIT_ZEROS: [u32; 10] = [
    0x0030, // ASCII
    0x0E50, // Thai
    0x0ED0, // Lao
    0x0660, // Arabic-Indic
    0x06F0, // Extended Arabic-Indic
    0x0966, // Devanagari
    0x09E6, // Bengali
    0x1040, // Myanmar
    0x17E0, // Khmer
    0xFF10, // Fullwidth
];

fn unit_pattern(keywords: &str) -> Regex {
    let digits: String = DIGIT_ZEROS
        .iter()
        .map(|zero| format!(r"\x{{{zero:04X}}}-\x{{{:04X}}}", zero + 9))
        .collect();
    // Patterns are compile-time literals; a failure here is a programming error.
    Regex::new(&format!(r"(?i)([{digits}]+)\s*(?:{keywords})")).expect("unit pattern is valid")
}

/// Convert SLA text such as `"1 วัน 4 ชั่วโมง"` into minutes.
///
/// `None` and text without any unit keyword both produce `ZERO_BUDGET`.
pub fn parse_duration(spec: Option<&str>) -> Minutes {
    let Some(text) = spec else {
        return ZERO_BUDGET;
    };

    let days = sum_counts(&DAY_PATTERN, text);
    let hours = sum_counts(&HOUR_PATTERN, text);
    let minutes = sum_counts(&MINUTE_PATTERN, text);

    let total = days
        .saturating_mul(MINUTES_PER_DAY as u64)
        .saturating_add(hours.saturating_mul(MINUTES_PER_HOUR as u64))
        .saturating_add(minutes);
    Minutes::try_from(total).unwrap_or(Minutes::MAX)
}

fn sum_counts(pattern: &Regex, text: &str) -> u64 {
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| parse_count(m.as_str()))
        .fold(0u64, u64::saturating_add)
}

/// Value of one decimal digit in any script listed in `DIGIT_ZEROS`.
fn digit_value(c: char) -> Option<u64> {
    let code = u32::from(c);
    DIGIT_ZEROS
        .iter()
        .find(|&&zero| (zero..=zero + 9).contains(&code))
        .map(|&zero| u64::from(code - zero))
}

/// Digits may mix scripts. Only a count too large for u64 saturates.
fn parse_count(digits: &str) -> u64 {
    digits
        .chars()
        .filter_map(digit_value)
        .try_fold(0u64, |acc, d| acc.checked_mul(10)?.checked_add(d))
        .unwrap_or(u64::MAX)
}
