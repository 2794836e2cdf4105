//! Calendar helpers for date-only arithmetic.
//!
//! Everything here works on [`NaiveDate`] so weekday and day-of-month
//! comparisons never depend on a time zone or a time of day.

use chrono::{Datelike, Months, NaiveDate, Weekday};

use crate::error::CoreError;

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`).
pub fn parse_iso_date(input: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| CoreError::InvalidInput(format!("Invalid date '{}': expected YYYY-MM-DD", input)))
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Lowercase full weekday name, the spelling the task form uses.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Parse a weekday from its full, three-letter or two-letter name.
pub fn parse_weekday(input: &str) -> Result<Weekday, CoreError> {
    match input.trim().to_lowercase().as_str() {
        "monday" | "mon" | "mo" => Ok(Weekday::Mon),
        "tuesday" | "tue" | "tu" => Ok(Weekday::Tue),
        "wednesday" | "wed" | "we" => Ok(Weekday::Wed),
        "thursday" | "thu" | "th" => Ok(Weekday::Thu),
        "friday" | "fri" | "fr" => Ok(Weekday::Fri),
        "saturday" | "sat" | "sa" => Ok(Weekday::Sat),
        "sunday" | "sun" | "su" => Ok(Weekday::Sun),
        _ => Err(CoreError::InvalidInput(format!("Invalid weekday: {}", input))),
    }
}

/// Add whole calendar months, clamping to the last day of a shorter month.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Whole months elapsed from `from` to `to` (negative when `to` is earlier).
///
/// A month is complete once the day of month reaches `from`'s day again, so
/// 2024-01-20 to 2024-02-19 is zero months and to 2024-02-20 is one.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let calendar = month_index(to) - month_index(from);
    if calendar > 0 && to.day() < from.day() {
        calendar - 1
    } else if calendar < 0 && to.day() > from.day() {
        calendar + 1
    } else {
        calendar
    }
}

fn month_index(date: NaiveDate) -> i64 {
    date.year() as i64 * 12 + date.month0() as i64
}

/// Whole weeks elapsed from `from` to `to`, counted in seven-day blocks
/// starting at `from`.
pub fn weeks_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days().div_euclid(7)
}

/// 1-based ordinal of `date`'s weekday within its month ("3rd Tuesday" → 3).
pub fn week_of_month(date: NaiveDate) -> u32 {
    (date.day() - 1) / 7 + 1
}
