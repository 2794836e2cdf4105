//! Recurring task configuration.
//!
//! Two representations live here:
//!
//! - [`RecurrenceForm`]: the raw, user-edited object the task form submits.
//!   Every field is present regardless of the chosen pattern, and numeric
//!   fields are signed so out-of-range input can be reported per field.
//! - [`Recurrence`]: the typed configuration the expander consumes. Each
//!   rule variant carries only the fields that apply to it, so a weekly rule
//!   without weekdays or a monthly rule without a day cannot be expressed.
//!
//! [`Recurrence::from_form`] runs the validator and converts one into the
//! other; [`RecurrenceExpander`] turns a `Recurrence` into dated tasks.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::dates::{format_iso_date, parse_weekday, week_of_month, weekday_name};
use crate::error::{CoreError, ValidationErrors};

pub mod expand;
pub mod validate;

pub use expand::{ExpansionLimits, RecurrenceExpander, IDLE_MONTHS, MAX_INSTANCES};
pub use validate::validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Custom,
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Daily => write!(f, "daily"),
            Pattern::Weekly => write!(f, "weekly"),
            Pattern::Monthly => write!(f, "monthly"),
            Pattern::Yearly => write!(f, "yearly"),
            Pattern::Custom => write!(f, "custom"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid recurrence pattern: {0}")]
pub struct ParsePatternError(String);

impl FromStr for Pattern {
    type Err = ParsePatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Pattern::Daily),
            "weekly" => Ok(Pattern::Weekly),
            "monthly" => Ok(Pattern::Monthly),
            "yearly" => Ok(Pattern::Yearly),
            "custom" => Ok(Pattern::Custom),
            _ => Err(ParsePatternError(s.to_string())),
        }
    }
}

/// How a monthly pattern picks its day.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MonthlyType {
    /// A fixed day number (`dayOfMonth`).
    #[default]
    DayOfMonth,
    /// The same "Nth weekday" as the start date.
    WeekOfMonth,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid monthly type: {0}")]
pub struct ParseMonthlyTypeError(String);

impl FromStr for MonthlyType {
    type Err = ParseMonthlyTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "dayofmonth" => Ok(MonthlyType::DayOfMonth),
            "weekofmonth" => Ok(MonthlyType::WeekOfMonth),
            _ => Err(ParseMonthlyTypeError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EndType {
    #[default]
    Never,
    Date,
    #[serde(alias = "occurrences")]
    After,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid end type: {0}")]
pub struct ParseEndTypeError(String);

impl FromStr for EndType {
    type Err = ParseEndTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "never" => Ok(EndType::Never),
            "date" => Ok(EndType::Date),
            "after" | "occurrences" => Ok(EndType::After),
            _ => Err(ParseEndTypeError(s.to_string())),
        }
    }
}

/// The recurrence settings exactly as the task form submits them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceForm {
    pub pattern: Pattern,
    #[serde(default = "default_frequency")]
    pub frequency: i64,
    #[serde(default)]
    pub days_of_week: Vec<String>,
    #[serde(default)]
    pub day_of_month: Option<i64>,
    #[serde(default)]
    pub monthly_type: MonthlyType,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_type: EndType,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_after: Option<i64>,
}

fn default_frequency() -> i64 {
    1
}

impl RecurrenceForm {
    /// A form with the dashboard's defaults: every 1 unit, never ending.
    pub fn new(pattern: Pattern, start_date: NaiveDate) -> Self {
        Self {
            pattern,
            frequency: default_frequency(),
            days_of_week: Vec::new(),
            day_of_month: None,
            monthly_type: MonthlyType::default(),
            start_date,
            end_type: EndType::Never,
            end_date: None,
            end_after: None,
        }
    }
}

/// A set of weekdays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DaySet(u8);

impl DaySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.num_days_from_monday();
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in Monday → Sunday order.
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        ALL_WEEKDAYS.iter().copied().filter(move |d| self.contains(*d))
    }
}

const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

impl FromIterator<Weekday> for DaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = DaySet::new();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

/// Which day of a month a monthly rule lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthlyOn {
    /// Day number 1–31. Months without that day contribute nothing.
    Day(u32),
    /// The `ordinal`-th `weekday` of the month, `ordinal` in 1–5.
    Weekday { ordinal: u32, weekday: Weekday },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrenceRule {
    Daily { every: u32 },
    Weekly { every: u32, days: DaySet },
    Monthly { every: u32, on: MonthlyOn },
}

impl RecurrenceRule {
    /// The interval multiplier ("every N units").
    pub fn every(&self) -> u32 {
        match self {
            RecurrenceRule::Daily { every }
            | RecurrenceRule::Weekly { every, .. }
            | RecurrenceRule::Monthly { every, .. } => *every,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCondition {
    Never,
    /// Inclusive last date.
    On(NaiveDate),
    /// Stop after this many occurrences.
    After(u32),
}

/// A validated recurrence: rule, inclusive start date and end condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recurrence {
    pub rule: RecurrenceRule,
    pub start: NaiveDate,
    pub end: EndCondition,
}

impl Recurrence {
    /// Validate `form` against `today` and convert it.
    ///
    /// Any rule violation is returned as `CoreError::Configuration` carrying
    /// every offending field; nothing is converted in that case.
    pub fn from_form(form: &RecurrenceForm, today: NaiveDate) -> Result<Self, CoreError> {
        validate(form, today).into_result()?;

        let every = to_u32(form.frequency, "frequency")?;
        let rule = match form.pattern {
            Pattern::Daily => RecurrenceRule::Daily { every },
            Pattern::Weekly => {
                let days = form
                    .days_of_week
                    .iter()
                    .map(|d| parse_weekday(d))
                    .collect::<Result<DaySet, _>>()
                    .map_err(|e| field_error("daysOfWeek", e.to_string()))?;
                RecurrenceRule::Weekly { every, days }
            }
            Pattern::Monthly => {
                let on = match form.monthly_type {
                    MonthlyType::DayOfMonth => {
                        let day = form
                            .day_of_month
                            .ok_or_else(|| field_error("dayOfMonth", "Day of month is required"))?;
                        MonthlyOn::Day(to_u32(day, "dayOfMonth")?)
                    }
                    MonthlyType::WeekOfMonth => MonthlyOn::Weekday {
                        ordinal: week_of_month(form.start_date),
                        weekday: form.start_date.weekday(),
                    },
                };
                RecurrenceRule::Monthly { every, on }
            }
            Pattern::Yearly | Pattern::Custom => {
                return Err(field_error("pattern", unsupported_pattern_message(form.pattern)));
            }
        };

        let end = match form.end_type {
            EndType::Never => EndCondition::Never,
            EndType::Date => EndCondition::On(
                form.end_date
                    .ok_or_else(|| field_error("endDate", "End date is required"))?,
            ),
            EndType::After => {
                let count = form
                    .end_after
                    .ok_or_else(|| field_error("endAfter", "Number of occurrences is required"))?;
                EndCondition::After(to_u32(count, "endAfter")?)
            }
        };

        Ok(Self {
            rule,
            start: form.start_date,
            end,
        })
    }
}

pub(crate) fn unsupported_pattern_message(pattern: Pattern) -> String {
    format!("The {} pattern is not supported", pattern)
}

fn field_error(field: &str, message: impl Into<String>) -> CoreError {
    let mut errors = ValidationErrors::new();
    errors.add(field, message);
    CoreError::Configuration(errors)
}

fn to_u32(value: i64, field: &str) -> Result<u32, CoreError> {
    u32::try_from(value).map_err(|_| field_error(field, format!("{} is out of range", value)))
}

fn ordinal_suffix(n: u32) -> &'static str {
    match (n % 10, n % 100) {
        (1, 11) | (2, 12) | (3, 13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

fn unit(every: u32, singular: &str) -> String {
    if every == 1 {
        format!("every {}", singular)
    } else {
        format!("every {} {}s", every, singular)
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rule {
            RecurrenceRule::Daily { every } => write!(f, "{}", unit(every, "day"))?,
            RecurrenceRule::Weekly { every, days } => {
                let names: Vec<&str> = days.iter().map(weekday_name).collect();
                write!(f, "{} on {}", unit(every, "week"), names.join(", "))?;
            }
            RecurrenceRule::Monthly { every, on } => match on {
                MonthlyOn::Day(day) => write!(f, "{} on day {}", unit(every, "month"), day)?,
                MonthlyOn::Weekday { ordinal, weekday } => write!(
                    f,
                    "{} on the {}{} {}",
                    unit(every, "month"),
                    ordinal,
                    ordinal_suffix(ordinal),
                    weekday_name(weekday)
                )?,
            },
        }

        write!(f, " from {}", format_iso_date(self.start))?;

        match self.end {
            EndCondition::Never => Ok(()),
            EndCondition::On(date) => write!(f, " until {}", format_iso_date(date)),
            EndCondition::After(1) => write!(f, " for 1 occurrence"),
            EndCondition::After(n) => write!(f, " for {} occurrences", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    mod form_tests {
        use super::*;

        #[test]
        fn test_deserialize_raw_form() {
            let json = r#"{
                "pattern": "weekly",
                "frequency": 2,
                "daysOfWeek": ["monday", "friday"],
                "startDate": "2024-01-01",
                "endType": "date",
                "endDate": "2024-03-01"
            }"#;
            let form: RecurrenceForm = serde_json::from_str(json).unwrap();
            assert_eq!(form.pattern, Pattern::Weekly);
            assert_eq!(form.frequency, 2);
            assert_eq!(form.days_of_week, vec!["monday", "friday"]);
            assert_eq!(form.monthly_type, MonthlyType::DayOfMonth);
            assert_eq!(form.end_type, EndType::Date);
            assert_eq!(form.end_date, Some(date(2024, 3, 1)));
            assert_eq!(form.end_after, None);
        }

        #[test]
        fn test_occurrences_alias_for_after() {
            let json = r#"{"pattern":"daily","startDate":"2024-01-01","endType":"occurrences","endAfter":5}"#;
            let form: RecurrenceForm = serde_json::from_str(json).unwrap();
            assert_eq!(form.end_type, EndType::After);
            assert_eq!(form.frequency, 1);
        }

        #[test]
        fn test_enum_from_str() {
            assert_eq!(Pattern::from_str("Monthly").unwrap(), Pattern::Monthly);
            assert!(Pattern::from_str("hourly").is_err());
            assert_eq!(MonthlyType::from_str("week-of-month").unwrap(), MonthlyType::WeekOfMonth);
            assert_eq!(MonthlyType::from_str("dayOfMonth").unwrap(), MonthlyType::DayOfMonth);
            assert_eq!(EndType::from_str("occurrences").unwrap(), EndType::After);
        }
    }

    mod day_set_tests {
        use super::*;

        #[test]
        fn test_insert_and_iterate_in_week_order() {
            let set: DaySet = [Weekday::Fri, Weekday::Mon, Weekday::Fri].into_iter().collect();
            assert_eq!(set.len(), 2);
            assert!(set.contains(Weekday::Mon));
            assert!(!set.contains(Weekday::Tue));
            assert_eq!(set.iter().collect::<Vec<_>>(), vec![Weekday::Mon, Weekday::Fri]);
        }

        #[test]
        fn test_empty() {
            assert!(DaySet::new().is_empty());
        }
    }

    mod conversion_tests {
        use super::*;

        #[test]
        fn test_weekly_form_converts() {
            let mut form = RecurrenceForm::new(Pattern::Weekly, date(2024, 1, 1));
            form.days_of_week = vec!["monday".into(), "fri".into()];
            form.end_type = EndType::After;
            form.end_after = Some(4);

            let recurrence = Recurrence::from_form(&form, date(2024, 1, 1)).unwrap();
            match recurrence.rule {
                RecurrenceRule::Weekly { every, days } => {
                    assert_eq!(every, 1);
                    assert!(days.contains(Weekday::Mon));
                    assert!(days.contains(Weekday::Fri));
                }
                other => panic!("unexpected rule {:?}", other),
            }
            assert_eq!(recurrence.end, EndCondition::After(4));
        }

        #[test]
        fn test_week_of_month_derives_ordinal_from_start() {
            // 2024-01-16 is the third Tuesday of January.
            let mut form = RecurrenceForm::new(Pattern::Monthly, date(2024, 1, 16));
            form.monthly_type = MonthlyType::WeekOfMonth;

            let recurrence = Recurrence::from_form(&form, date(2024, 1, 1)).unwrap();
            assert_eq!(
                recurrence.rule,
                RecurrenceRule::Monthly {
                    every: 1,
                    on: MonthlyOn::Weekday { ordinal: 3, weekday: Weekday::Tue },
                }
            );
        }

        #[test]
        fn test_invalid_form_reports_every_field() {
            let mut form = RecurrenceForm::new(Pattern::Weekly, date(2023, 12, 1));
            form.frequency = 0;
            form.end_type = EndType::Date;

            match Recurrence::from_form(&form, date(2024, 1, 1)) {
                Err(CoreError::Configuration(errors)) => {
                    assert!(errors.contains("startDate"));
                    assert!(errors.contains("frequency"));
                    assert!(errors.contains("daysOfWeek"));
                    assert!(errors.contains("endDate"));
                }
                other => panic!("expected configuration error, got {:?}", other),
            }
        }

        #[test]
        fn test_yearly_is_rejected() {
            let form = RecurrenceForm::new(Pattern::Yearly, date(2024, 1, 1));
            match Recurrence::from_form(&form, date(2024, 1, 1)) {
                Err(CoreError::Configuration(errors)) => assert!(errors.contains("pattern")),
                other => panic!("expected configuration error, got {:?}", other),
            }
        }
    }

    mod display_tests {
        use super::*;

        #[test]
        fn test_display_summaries() {
            let daily = Recurrence {
                rule: RecurrenceRule::Daily { every: 1 },
                start: date(2024, 1, 1),
                end: EndCondition::After(3),
            };
            assert_eq!(daily.to_string(), "every day from 2024-01-01 for 3 occurrences");

            let weekly = Recurrence {
                rule: RecurrenceRule::Weekly {
                    every: 2,
                    days: [Weekday::Fri, Weekday::Mon].into_iter().collect(),
                },
                start: date(2024, 1, 1),
                end: EndCondition::On(date(2024, 1, 15)),
            };
            assert_eq!(
                weekly.to_string(),
                "every 2 weeks on monday, friday from 2024-01-01 until 2024-01-15"
            );

            let monthly = Recurrence {
                rule: RecurrenceRule::Monthly {
                    every: 1,
                    on: MonthlyOn::Weekday { ordinal: 3, weekday: Weekday::Tue },
                },
                start: date(2024, 1, 16),
                end: EndCondition::Never,
            };
            assert_eq!(monthly.to_string(), "every month on the 3rd tuesday from 2024-01-16");
        }

        #[test]
        fn test_ordinal_suffix() {
            assert_eq!(ordinal_suffix(1), "st");
            assert_eq!(ordinal_suffix(2), "nd");
            assert_eq!(ordinal_suffix(4), "th");
            assert_eq!(ordinal_suffix(11), "th");
        }
    }
}
