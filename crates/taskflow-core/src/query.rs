use chrono::NaiveDate;
use std::cmp::Ordering;
use std::str::FromStr;
use thiserror::Error;

use crate::models::{Task, TaskPriority};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    And,
    Or,
}

/// A boolean filter expression over tasks.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Query {
    /// Matches every task.
    #[default]
    All,
    Filter(Filter),
    Not(Box<Query>),
    Binary {
        op: Operator,
        left: Box<Query>,
        right: Box<Query>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Category(String),
    Priority(TaskPriority),
    Status(TaskState),
    /// Case-insensitive substring of the title or description.
    Search(String),
    Due(DueFilter),
    Recurring(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Completed,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid task status: {0}")]
pub struct ParseTaskStateError(String);

impl FromStr for TaskState {
    type Err = ParseTaskStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" | "open" | "todo" => Ok(TaskState::Pending),
            "completed" | "done" => Ok(TaskState::Completed),
            _ => Err(ParseTaskStateError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueFilter {
    Today,
    /// Pending with a due date before today.
    Overdue,
    /// Due strictly before the date.
    Before(NaiveDate),
    /// Due strictly after the date.
    After(NaiveDate),
}

impl Query {
    pub fn filter(filter: Filter) -> Self {
        Query::Filter(filter)
    }

    pub fn and(self, other: Query) -> Self {
        Query::Binary {
            op: Operator::And,
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    pub fn or(self, other: Query) -> Self {
        Query::Binary {
            op: Operator::Or,
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    pub fn negate(self) -> Self {
        Query::Not(Box::new(self))
    }

    /// Evaluate against `task`; `today` anchors the due-date filters.
    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        match self {
            Query::All => true,
            Query::Filter(filter) => filter.matches(task, today),
            Query::Not(inner) => !inner.matches(task, today),
            Query::Binary { op, left, right } => match op {
                Operator::And => left.matches(task, today) && right.matches(task, today),
                Operator::Or => left.matches(task, today) || right.matches(task, today),
            },
        }
    }
}

impl Filter {
    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        match self {
            Filter::Category(name) => task.category.eq_ignore_ascii_case(name),
            Filter::Priority(priority) => task.priority == *priority,
            Filter::Status(TaskState::Pending) => !task.completed,
            Filter::Status(TaskState::Completed) => task.completed,
            Filter::Search(term) => {
                let term = term.to_lowercase();
                task.title.to_lowercase().contains(&term)
                    || task.description.to_lowercase().contains(&term)
            }
            Filter::Due(due) => match (due, task.due_date) {
                (DueFilter::Overdue, _) => task.is_overdue(today),
                (DueFilter::Today, Some(date)) => date == today,
                (DueFilter::Before(limit), Some(date)) => date < *limit,
                (DueFilter::After(limit), Some(date)) => date > *limit,
                (_, None) => false,
            },
            Filter::Recurring(flag) => task.is_recurring() == *flag,
        }
    }
}

/// Ordering for task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Earliest due first; undated tasks last.
    #[default]
    DueDate,
    /// High priority first.
    Priority,
    /// Newest first.
    Created,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid sort order: {0}")]
pub struct ParseSortByError(String);

impl FromStr for SortBy {
    type Err = ParseSortByError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "due" | "duedate" => Ok(SortBy::DueDate),
            "priority" => Ok(SortBy::Priority),
            "created" | "createdat" => Ok(SortBy::Created),
            _ => Err(ParseSortByError(s.to_string())),
        }
    }
}

impl SortBy {
    /// Compare two tasks. Ties fall back to recurring instance number, then id,
    /// so listings are stable across calls.
    pub fn compare(self, a: &Task, b: &Task) -> Ordering {
        let primary = match self {
            SortBy::DueDate => match (a.due_date, b.due_date) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortBy::Priority => b.priority.cmp(&a.priority),
            SortBy::Created => b.created_at.cmp(&a.created_at),
        };

        primary
            .then_with(|| a.recurring_instance.cmp(&b.recurring_instance))
            .then_with(|| a.id.cmp(&b.id))
    }

    pub fn sort(self, tasks: &mut [Task]) {
        tasks.sort_by(|a, b| self.compare(a, b));
    }
}
