use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{EndCondition, MonthlyOn, Recurrence, RecurrenceRule};
use crate::dates::{add_months, months_between, week_of_month, weeks_between};
use crate::error::CoreError;
use crate::models::{RecurringBatch, TaskTemplate};

/// Absolute cap on instances generated from one recurrence.
pub const MAX_INSTANCES: usize = 100;

/// Expansion gives up when this many months pass without a single match.
pub const IDLE_MONTHS: u32 = 12;

/// Tunable expansion bounds.
///
/// `max_instances` can only tighten the absolute cap: larger values are
/// clamped to [`MAX_INSTANCES`] when the expander is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionLimits {
    pub max_instances: usize,
}

impl Default for ExpansionLimits {
    fn default() -> Self {
        Self {
            max_instances: MAX_INSTANCES,
        }
    }
}

/// Why an expansion stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndDate,
    OccurrenceCount,
    InstanceCap,
    NoMatch,
    CalendarExhausted,
}

/// Enumerates the calendar dates a [`Recurrence`] lands on and turns them
/// into task instances.
///
/// Expansion is eager and one-shot: each call walks the calendar from the
/// start date and returns the complete, strictly increasing list of dates.
/// Walking is day by day for weekly and monthly rules (the rule decides
/// which days match) and in steps of `every` days for daily rules.
#[derive(Debug, Clone, Default)]
pub struct RecurrenceExpander {
    limits: ExpansionLimits,
}

impl RecurrenceExpander {
    pub fn new(limits: ExpansionLimits) -> Self {
        Self {
            limits: ExpansionLimits {
                max_instances: limits.max_instances.min(MAX_INSTANCES),
            },
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(ExpansionLimits::default())
    }

    pub fn limits(&self) -> &ExpansionLimits {
        &self.limits
    }

    /// All matching dates up to the end condition or a safety bound.
    pub fn occurrences(&self, recurrence: &Recurrence) -> Result<Vec<NaiveDate>, CoreError> {
        let (dates, _) = self.walk(recurrence, self.limits.max_instances)?;
        Ok(dates)
    }

    /// The first `count` matching dates, for showing the user what a
    /// configuration will produce before it is saved.
    pub fn preview(&self, recurrence: &Recurrence, count: usize) -> Result<Vec<NaiveDate>, CoreError> {
        let (dates, _) = self.walk(recurrence, count.min(self.limits.max_instances))?;
        Ok(dates)
    }

    /// Generate one task per matching date from `template`.
    ///
    /// All instances share a fresh `recurring_task_id`, are numbered from 1
    /// in date order, and are stamped with `now` as their creation time.
    pub fn expand(
        &self,
        template: &TaskTemplate,
        recurrence: &Recurrence,
        now: DateTime<Utc>,
    ) -> Result<RecurringBatch, CoreError> {
        let dates = self.occurrences(recurrence)?;
        let recurring_task_id = Uuid::now_v7();

        let tasks = dates
            .into_iter()
            .zip(1u32..)
            .map(|(due, ordinal)| template.instantiate(due, now, recurring_task_id, ordinal))
            .collect();

        Ok(RecurringBatch {
            recurring_task_id,
            tasks,
        })
    }

    fn walk(&self, recurrence: &Recurrence, cap: usize) -> Result<(Vec<NaiveDate>, StopReason), CoreError> {
        recurrence.check()?;

        let start = recurrence.start;
        let hard_stop = match recurrence.end {
            EndCondition::On(end) => Some(end),
            _ => None,
        };
        let (wanted, wanted_reason) = match recurrence.end {
            EndCondition::After(n) if (n as usize) <= cap => (n as usize, StopReason::OccurrenceCount),
            _ => (cap, StopReason::InstanceCap),
        };
        let idle_limit = add_months(start, IDLE_MONTHS);
        let step = Days::new(recurrence.rule.step_days());

        debug!(%recurrence, wanted, "RecurrenceExpander::walk: starting");

        let mut dates = Vec::with_capacity(wanted.min(self.limits.max_instances));
        let mut current = start;

        let reason = loop {
            if hard_stop.map_or(false, |end| current > end) {
                break StopReason::EndDate;
            }
            if dates.len() >= wanted {
                break wanted_reason;
            }
            if dates.is_empty() && current > idle_limit {
                break StopReason::NoMatch;
            }

            if recurrence.rule.matches(start, current) {
                dates.push(current);
            }

            current = match current.checked_add_days(step) {
                Some(next) => next,
                None => break StopReason::CalendarExhausted,
            };
        };

        match reason {
            StopReason::NoMatch => warn!(
                %recurrence,
                idle_months = IDLE_MONTHS,
                "no occurrence found within the idle window, giving up"
            ),
            _ => debug!(?reason, count = dates.len(), "RecurrenceExpander::walk: finished"),
        }

        Ok((dates, reason))
    }
}

impl RecurrenceRule {
    /// Days to advance between candidate dates.
    fn step_days(&self) -> u64 {
        match self {
            RecurrenceRule::Daily { every } => u64::from(*every),
            RecurrenceRule::Weekly { .. } | RecurrenceRule::Monthly { .. } => 1,
        }
    }

    /// Whether `date` is an occurrence of a series starting on `start`.
    ///
    /// Daily rules match every `every`th day. Weekly and monthly rules also
    /// require the whole weeks or months elapsed since `start` to be a
    /// multiple of `every`.
    pub fn matches(&self, start: NaiveDate, date: NaiveDate) -> bool {
        match self {
            RecurrenceRule::Daily { every } => {
                (date - start).num_days().rem_euclid(i64::from(*every)) == 0
            }
            RecurrenceRule::Weekly { every, days } => {
                days.contains(date.weekday())
                    && weeks_between(start, date).rem_euclid(i64::from(*every)) == 0
            }
            RecurrenceRule::Monthly { every, on } => {
                let on_day = match on {
                    MonthlyOn::Day(day) => date.day() == *day,
                    MonthlyOn::Weekday { ordinal, weekday } => {
                        date.weekday() == *weekday && week_of_month(date) == *ordinal
                    }
                };
                on_day && months_between(start, date).rem_euclid(i64::from(*every)) == 0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::weekday_name;
    use crate::models::TaskPriority;
    use crate::recurrence::{DaySet, Pattern, RecurrenceForm};
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn days(list: &[Weekday]) -> DaySet {
        list.iter().copied().collect()
    }

    fn template() -> TaskTemplate {
        TaskTemplate {
            title: "Review inbox".to_string(),
            description: "Zero it out".to_string(),
            category: "work".to_string(),
            priority: TaskPriority::High,
        }
    }

    mod scenario_tests {
        use super::*;

        #[test]
        fn test_daily_after_three() {
            let recurrence = Recurrence {
                rule: RecurrenceRule::Daily { every: 1 },
                start: date(2024, 1, 1),
                end: EndCondition::After(3),
            };
            let dates = RecurrenceExpander::with_defaults().occurrences(&recurrence).unwrap();
            assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]);
        }

        #[test]
        fn test_weekly_monday_friday_until_date() {
            let recurrence = Recurrence {
                rule: RecurrenceRule::Weekly {
                    every: 1,
                    days: days(&[Weekday::Mon, Weekday::Fri]),
                },
                start: date(2024, 1, 1),
                end: EndCondition::On(date(2024, 1, 15)),
            };
            let dates = RecurrenceExpander::with_defaults().occurrences(&recurrence).unwrap();
            assert_eq!(
                dates,
                vec![
                    date(2024, 1, 1),
                    date(2024, 1, 5),
                    date(2024, 1, 8),
                    date(2024, 1, 12),
                    date(2024, 1, 15),
                ]
            );
        }

        #[test]
        fn test_monthly_day_31_skips_short_months() {
            let recurrence = Recurrence {
                rule: RecurrenceRule::Monthly { every: 1, on: MonthlyOn::Day(31) },
                start: date(2024, 2, 1),
                end: EndCondition::After(2),
            };
            let dates = RecurrenceExpander::with_defaults().occurrences(&recurrence).unwrap();
            assert_eq!(dates, vec![date(2024, 3, 31), date(2024, 5, 31)]);
        }

        #[test]
        fn test_end_date_before_first_match_is_empty() {
            let recurrence = Recurrence {
                rule: RecurrenceRule::Monthly { every: 1, on: MonthlyOn::Day(20) },
                start: date(2024, 1, 1),
                end: EndCondition::On(date(2024, 1, 10)),
            };
            let batch = RecurrenceExpander::with_defaults()
                .expand(&template(), &recurrence, Utc::now())
                .unwrap();
            assert!(batch.is_empty());
        }
    }

    mod edge_case_tests {
        use super::*;

        #[test]
        fn test_start_date_is_eligible() {
            let recurrence = Recurrence {
                rule: RecurrenceRule::Weekly { every: 1, days: days(&[Weekday::Wed]) },
                start: date(2024, 1, 3),
                end: EndCondition::After(1),
            };
            let dates = RecurrenceExpander::with_defaults().occurrences(&recurrence).unwrap();
            assert_eq!(dates, vec![date(2024, 1, 3)]);
        }

        #[test]
        fn test_leap_day_only_in_leap_years() {
            let recurrence = Recurrence {
                rule: RecurrenceRule::Monthly { every: 1, on: MonthlyOn::Day(29) },
                start: date(2024, 1, 1),
                end: EndCondition::On(date(2025, 12, 31)),
            };
            let dates = RecurrenceExpander::with_defaults().occurrences(&recurrence).unwrap();
            assert!(dates.contains(&date(2024, 2, 29)));
            assert!(!dates.iter().any(|d| d.year() == 2025 && d.month() == 2));
            assert_eq!(dates.len(), 23);
        }

        #[test]
        fn test_daily_frequency_steps() {
            let recurrence = Recurrence {
                rule: RecurrenceRule::Daily { every: 3 },
                start: date(2024, 1, 30),
                end: EndCondition::After(4),
            };
            let dates = RecurrenceExpander::with_defaults().occurrences(&recurrence).unwrap();
            assert_eq!(
                dates,
                vec![date(2024, 1, 30), date(2024, 2, 2), date(2024, 2, 5), date(2024, 2, 8)]
            );

            let rule = RecurrenceRule::Daily { every: 3 };
            assert!(rule.matches(date(2024, 1, 30), date(2024, 2, 2)));
            assert!(!rule.matches(date(2024, 1, 30), date(2024, 2, 3)));
        }

        #[test]
        fn test_weekly_every_two_weeks() {
            // Starts on a Wednesday, so the first two-week block runs to the
            // following Tuesday and takes in Monday the 8th.
            let recurrence = Recurrence {
                rule: RecurrenceRule::Weekly {
                    every: 2,
                    days: days(&[Weekday::Mon, Weekday::Thu]),
                },
                start: date(2024, 1, 3),
                end: EndCondition::After(4),
            };
            let dates = RecurrenceExpander::with_defaults().occurrences(&recurrence).unwrap();
            assert_eq!(
                dates,
                vec![date(2024, 1, 4), date(2024, 1, 8), date(2024, 1, 18), date(2024, 1, 22)]
            );
        }

        #[test]
        fn test_monthly_every_three_months() {
            let recurrence = Recurrence {
                rule: RecurrenceRule::Monthly { every: 3, on: MonthlyOn::Day(15) },
                start: date(2024, 1, 20),
                end: EndCondition::After(3),
            };
            let dates = RecurrenceExpander::with_defaults().occurrences(&recurrence).unwrap();
            // February 15th is less than a whole month after the start.
            assert_eq!(dates, vec![date(2024, 2, 15), date(2024, 5, 15), date(2024, 8, 15)]);
        }

        #[test]
        fn test_monthly_third_tuesday() {
            let recurrence = Recurrence {
                rule: RecurrenceRule::Monthly {
                    every: 1,
                    on: MonthlyOn::Weekday { ordinal: 3, weekday: Weekday::Tue },
                },
                start: date(2024, 1, 16),
                end: EndCondition::After(3),
            };
            let dates = RecurrenceExpander::with_defaults().occurrences(&recurrence).unwrap();
            assert_eq!(dates, vec![date(2024, 1, 16), date(2024, 2, 20), date(2024, 3, 19)]);
        }

        #[test]
        fn test_fifth_weekday_skips_months_without_one() {
            // 2024-01-29 is the fifth Monday of January; February has none.
            let recurrence = Recurrence {
                rule: RecurrenceRule::Monthly {
                    every: 1,
                    on: MonthlyOn::Weekday { ordinal: 5, weekday: Weekday::Mon },
                },
                start: date(2024, 1, 29),
                end: EndCondition::After(2),
            };
            let dates = RecurrenceExpander::with_defaults().occurrences(&recurrence).unwrap();
            assert_eq!(dates, vec![date(2024, 1, 29), date(2024, 4, 29)]);
        }
    }

    mod safety_bound_tests {
        use super::*;

        #[test]
        fn test_never_ending_daily_hits_instance_cap() {
            let recurrence = Recurrence {
                rule: RecurrenceRule::Daily { every: 1 },
                start: date(2024, 1, 1),
                end: EndCondition::Never,
            };
            let expander = RecurrenceExpander::with_defaults();
            let (dates, reason) = expander.walk(&recurrence, 100).unwrap();
            assert_eq!(dates.len(), 100);
            assert_eq!(reason, StopReason::InstanceCap);
        }

        #[test]
        fn test_idle_window_stops_a_rule_that_never_matches() {
            // Every 12 months on the 31st, starting in April: only Aprils are
            // eligible and April has no 31st.
            let recurrence = Recurrence {
                rule: RecurrenceRule::Monthly { every: 12, on: MonthlyOn::Day(31) },
                start: date(2024, 4, 1),
                end: EndCondition::Never,
            };
            let expander = RecurrenceExpander::with_defaults();
            let (dates, reason) = expander.walk(&recurrence, 100).unwrap();
            assert!(dates.is_empty());
            assert_eq!(reason, StopReason::NoMatch);
        }

        #[test]
        fn test_after_count_above_cap_is_capped() {
            let limits = ExpansionLimits { max_instances: 5 };
            let recurrence = Recurrence {
                rule: RecurrenceRule::Daily { every: 1 },
                start: date(2024, 1, 1),
                end: EndCondition::After(50),
            };
            let dates = RecurrenceExpander::new(limits).occurrences(&recurrence).unwrap();
            assert_eq!(dates.len(), 5);
        }

        #[test]
        fn test_configured_cap_cannot_exceed_absolute_cap() {
            let expander = RecurrenceExpander::new(ExpansionLimits { max_instances: 1000 });
            assert_eq!(expander.limits().max_instances, MAX_INSTANCES);

            let recurrence = Recurrence {
                rule: RecurrenceRule::Daily { every: 1 },
                start: date(2024, 1, 1),
                end: EndCondition::Never,
            };
            assert_eq!(expander.occurrences(&recurrence).unwrap().len(), MAX_INSTANCES);
            assert_eq!(expander.preview(&recurrence, 500).unwrap().len(), MAX_INSTANCES);
        }

        #[test]
        fn test_hand_built_empty_weekly_is_rejected() {
            let recurrence = Recurrence {
                rule: RecurrenceRule::Weekly { every: 1, days: DaySet::new() },
                start: date(2024, 1, 1),
                end: EndCondition::Never,
            };
            let result = RecurrenceExpander::with_defaults().occurrences(&recurrence);
            assert!(matches!(result, Err(CoreError::Configuration(_))));
        }
    }

    mod expand_tests {
        use super::*;

        #[test]
        fn test_instances_share_group_and_are_numbered() {
            let recurrence = Recurrence {
                rule: RecurrenceRule::Weekly { every: 1, days: days(&[Weekday::Tue]) },
                start: date(2024, 1, 1),
                end: EndCondition::After(4),
            };
            let now = Utc::now();
            let batch = RecurrenceExpander::with_defaults()
                .expand(&template(), &recurrence, now)
                .unwrap();

            assert_eq!(batch.len(), 4);
            for (i, task) in batch.tasks.iter().enumerate() {
                assert_eq!(task.recurring_task_id, Some(batch.recurring_task_id));
                assert_eq!(task.recurring_instance, Some(i as u32 + 1));
                assert_eq!(task.title, "Review inbox");
                assert_eq!(task.priority, TaskPriority::High);
                assert_eq!(task.created_at, now);
                assert!(!task.completed);
                assert!(task.completed_at.is_none());
                assert_eq!(
                    weekday_name(task.due_date.unwrap().weekday()),
                    "tuesday"
                );
            }

            let mut ids: Vec<_> = batch.tasks.iter().map(|t| t.id).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), 4);
        }

        #[test]
        fn test_preview_takes_first_n() {
            let mut form = RecurrenceForm::new(Pattern::Daily, date(2024, 1, 1));
            form.frequency = 2;
            let recurrence = Recurrence::from_form(&form, date(2024, 1, 1)).unwrap();
            let dates = RecurrenceExpander::with_defaults().preview(&recurrence, 3).unwrap();
            assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 3), date(2024, 1, 5)]);
        }

        #[test]
        fn test_preview_respects_end_date() {
            let recurrence = Recurrence {
                rule: RecurrenceRule::Daily { every: 1 },
                start: date(2024, 1, 1),
                end: EndCondition::On(date(2024, 1, 2)),
            };
            let dates = RecurrenceExpander::with_defaults().preview(&recurrence, 3).unwrap();
            assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 2)]);
        }
    }
}
