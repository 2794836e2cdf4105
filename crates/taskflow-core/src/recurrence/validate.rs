use chrono::NaiveDate;

use super::{
    unsupported_pattern_message, EndCondition, EndType, MonthlyOn, MonthlyType, Pattern, Recurrence,
    RecurrenceForm, RecurrenceRule,
};
use crate::dates::parse_weekday;
use crate::error::{CoreError, ValidationErrors};

pub const MIN_FREQUENCY: i64 = 1;
pub const MAX_FREQUENCY: i64 = 365;
pub const MIN_END_AFTER: i64 = 1;
pub const MAX_END_AFTER: i64 = 100;
pub const MIN_DAY_OF_MONTH: i64 = 1;
pub const MAX_DAY_OF_MONTH: i64 = 31;

const FREQUENCY_MESSAGE: &str = "Frequency must be between 1 and 365";
const END_AFTER_MESSAGE: &str = "Number of occurrences must be between 1 and 100";
const DAY_OF_MONTH_MESSAGE: &str = "Day of month must be between 1 and 31";
const END_DATE_MESSAGE: &str = "End date must be after start date";
const DAYS_OF_WEEK_MESSAGE: &str = "Please select at least one day of the week";

/// Check a submitted form against `today`.
///
/// Returns every failing field at once; an empty result means the form can
/// be expanded. The form is never modified, so repeated calls agree.
pub fn validate(form: &RecurrenceForm, today: NaiveDate) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if form.start_date < today {
        errors.add("startDate", "Start date cannot be in the past");
    }

    match form.end_type {
        EndType::Never => {}
        EndType::Date => match form.end_date {
            None => errors.add("endDate", "End date is required"),
            Some(end) if end <= form.start_date => errors.add("endDate", END_DATE_MESSAGE),
            Some(_) => {}
        },
        EndType::After => match form.end_after {
            None => errors.add("endAfter", "Number of occurrences is required"),
            Some(n) if !(MIN_END_AFTER..=MAX_END_AFTER).contains(&n) => {
                errors.add("endAfter", END_AFTER_MESSAGE)
            }
            Some(_) => {}
        },
    }

    if !(MIN_FREQUENCY..=MAX_FREQUENCY).contains(&form.frequency) {
        errors.add("frequency", FREQUENCY_MESSAGE);
    }

    match form.pattern {
        Pattern::Daily => {}
        Pattern::Weekly => {
            if form.days_of_week.is_empty() {
                errors.add("daysOfWeek", DAYS_OF_WEEK_MESSAGE);
            } else if let Some(unknown) = form
                .days_of_week
                .iter()
                .find(|d| parse_weekday(d).is_err())
            {
                errors.add("daysOfWeek", format!("Unknown day of the week: {}", unknown));
            }
        }
        Pattern::Monthly => {
            if form.monthly_type == MonthlyType::DayOfMonth {
                match form.day_of_month {
                    None => errors.add("dayOfMonth", "Day of month is required"),
                    Some(day) if !(MIN_DAY_OF_MONTH..=MAX_DAY_OF_MONTH).contains(&day) => {
                        errors.add("dayOfMonth", DAY_OF_MONTH_MESSAGE)
                    }
                    Some(_) => {}
                }
            }
        }
        Pattern::Yearly | Pattern::Custom => {
            errors.add("pattern", unsupported_pattern_message(form.pattern));
        }
    }

    errors
}

impl Recurrence {
    /// Re-check the structural rules on an already typed recurrence.
    ///
    /// `from_form` output always passes; this guards values assembled by
    /// hand. The start-date-in-the-past rule is not applied here since it
    /// depends on when the form was submitted.
    pub fn check(&self) -> Result<(), CoreError> {
        let mut errors = ValidationErrors::new();

        if !(MIN_FREQUENCY..=MAX_FREQUENCY).contains(&(self.rule.every() as i64)) {
            errors.add("frequency", FREQUENCY_MESSAGE);
        }

        match self.rule {
            RecurrenceRule::Daily { .. } => {}
            RecurrenceRule::Weekly { days, .. } => {
                if days.is_empty() {
                    errors.add("daysOfWeek", DAYS_OF_WEEK_MESSAGE);
                }
            }
            RecurrenceRule::Monthly { on, .. } => match on {
                MonthlyOn::Day(day) => {
                    if !(MIN_DAY_OF_MONTH..=MAX_DAY_OF_MONTH).contains(&(day as i64)) {
                        errors.add("dayOfMonth", DAY_OF_MONTH_MESSAGE);
                    }
                }
                MonthlyOn::Weekday { ordinal, .. } => {
                    if !(1..=5).contains(&ordinal) {
                        errors.add("monthlyType", "Week of month must be between 1 and 5");
                    }
                }
            },
        }

        match self.end {
            EndCondition::Never => {}
            EndCondition::On(end) => {
                if end <= self.start {
                    errors.add("endDate", END_DATE_MESSAGE);
                }
            }
            EndCondition::After(n) => {
                if !(MIN_END_AFTER..=MAX_END_AFTER).contains(&(n as i64)) {
                    errors.add("endAfter", END_AFTER_MESSAGE);
                }
            }
        }

        errors.into_result()
    }
}
