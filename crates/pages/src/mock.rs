//! Helpers for building the fixed mock rows each page starts with.

use chrono::NaiveDate;

use opsdesk_core::{Money, RecordId};

/// Calendar date for mock rows. Out-of-range input falls back to `NaiveDate::MIN`.
pub(crate) fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

/// Stable id for mock row `n` of collection block `block`, so ids stay
/// unique across pages and survive `reset`.
pub(crate) fn id(block: u128, n: u128) -> RecordId {
    RecordId::from_u128(block * 1_000 + n)
}

pub(crate) fn usd(major: i64) -> Money {
    Money::from_major(major)
}
