use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use chrono_english::{parse_date_string, Dialect};
use taskflow_core::dates::parse_iso_date;

/// Parse an ISO date or a natural-language one ("tomorrow", "next friday"),
/// relative to `today`.
pub fn parse_date(date_str: &str, today: NaiveDate) -> Result<NaiveDate> {
    if let Ok(date) = parse_iso_date(date_str) {
        return Ok(date);
    }
    let base = today.and_time(NaiveTime::MIN).and_utc();
    parse_date_string(date_str, base, Dialect::Us)
        .map(|dt| dt.date_naive())
        .map_err(|e| anyhow::anyhow!("Failed to parse date '{}': {}", date_str, e))
}
