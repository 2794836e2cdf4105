use anyhow::{anyhow, Result};
use chrono::{Datelike, NaiveDate};
use taskflow_core::recurrence::{EndType, Pattern, RecurrenceForm};

use crate::cli::RecurrenceArgs;
use crate::parser::parse_date;

/// Build the raw recurrence form from command-line flags.
///
/// Values are passed through unchecked so the validator can report every
/// problem at once; only date parsing fails early.
pub fn build_form(args: &RecurrenceArgs, today: NaiveDate) -> Result<RecurrenceForm> {
    let pattern = args
        .every
        .ok_or_else(|| anyhow!("--every is required to describe a recurrence"))?;
    let start = args
        .start
        .as_deref()
        .map(|s| parse_date(s, today))
        .transpose()?
        .unwrap_or(today);

    let mut form = RecurrenceForm::new(pattern, start);
    form.frequency = args.frequency;
    form.days_of_week = args.on.iter().map(|d| d.trim().to_string()).collect();
    if let Some(monthly_type) = args.monthly_type {
        form.monthly_type = monthly_type;
    }
    form.day_of_month = match (pattern, args.day_of_month) {
        (_, Some(day)) => Some(day),
        (Pattern::Monthly, None) => Some(i64::from(start.day())),
        _ => None,
    };

    if let Some(until) = &args.until {
        form.end_type = EndType::Date;
        form.end_date = Some(parse_date(until, today)?);
    } else if let Some(count) = args.count {
        form.end_type = EndType::After;
        form.end_after = Some(count);
    }

    Ok(form)
}
