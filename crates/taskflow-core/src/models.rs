use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    /// Numeric code used by the dashboard (1 = low … 3 = high).
    pub fn code(self) -> u8 {
        match self {
            TaskPriority::Low => 1,
            TaskPriority::Medium => 2,
            TaskPriority::High => 3,
        }
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskPriority::Low => write!(f, "low"),
            TaskPriority::Medium => write!(f, "medium"),
            TaskPriority::High => write!(f, "high"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid task priority: {0}")]
pub struct ParseTaskPriorityError(String);

impl FromStr for TaskPriority {
    type Err = ParseTaskPriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" | "1" => Ok(TaskPriority::Low),
            "medium" | "2" => Ok(TaskPriority::Medium),
            "high" | "3" => Ok(TaskPriority::High),
            _ => Err(ParseTaskPriorityError(s.to_string())),
        }
    }
}

/// A task record as the store holds it.
///
/// Tasks produced by a recurring expansion carry `recurring_task_id` (shared
/// by every instance of that expansion) and a 1-based `recurring_instance`.
/// Once stored they are independent: editing one leaves its siblings alone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub completed: bool,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_task_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_instance: Option<u32>,
}

impl Task {
    /// A pending, undated, one-off task with a fresh id.
    pub fn new(title: impl Into<String>, category: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: title.into(),
            description: String::new(),
            category: category.into(),
            priority: TaskPriority::default(),
            completed: false,
            due_date: None,
            created_at,
            completed_at: None,
            recurring_task_id: None,
            recurring_instance: None,
        }
    }

    pub fn is_recurring(&self) -> bool {
        self.recurring_task_id.is_some()
    }

    /// Pending and due strictly before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.map_or(false, |due| due < today)
    }
}

/// The non-date fields copied verbatim into every generated instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskTemplate {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub priority: TaskPriority,
}

impl TaskTemplate {
    /// Materialize one instance of this template.
    pub fn instantiate(
        &self,
        due_date: NaiveDate,
        created_at: DateTime<Utc>,
        recurring_task_id: Uuid,
        recurring_instance: u32,
    ) -> Task {
        Task {
            description: self.description.clone(),
            priority: self.priority,
            due_date: Some(due_date),
            recurring_task_id: Some(recurring_task_id),
            recurring_instance: Some(recurring_instance),
            ..Task::new(self.title.clone(), self.category.clone(), created_at)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewTaskData {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<NaiveDate>,
}

impl NewTaskData {
    pub fn template(&self) -> TaskTemplate {
        TaskTemplate {
            title: self.title.clone(),
            description: self.description.clone().unwrap_or_default(),
            category: self.category.clone().unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            priority: self.priority.unwrap_or_default(),
        }
    }
}

/// Category assigned when the caller names none.
pub const DEFAULT_CATEGORY: &str = "personal";

#[derive(Debug, Clone, Default)]
pub struct UpdateTaskData {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Option<NaiveDate>>,
    pub completed: Option<bool>,
}

/// The tasks produced by one recurring expansion.
///
/// An empty batch is a valid outcome ("no occurrences with the current
/// settings"), not an error.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecurringBatch {
    pub recurring_task_id: Uuid,
    pub tasks: Vec<Task>,
}

impl RecurringBatch {
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn due_dates(&self) -> Vec<NaiveDate> {
        self.tasks.iter().filter_map(|t| t.due_date).collect()
    }
}

/// A task category. Tasks refer to categories by `id`, a short slug such
/// as `work` or `personal`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default = "default_category_color")]
    pub color: String,
}

impl Category {
    /// Slug used as the id of a category created from `name` alone.
    pub fn slug(name: &str) -> String {
        name.trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
    }
}

fn default_category_color() -> String {
    DEFAULT_CATEGORY_COLOR.to_string()
}

pub const DEFAULT_CATEGORY_COLOR: &str = "#6b7280";

#[derive(Debug, Clone, Default)]
pub struct NewCategoryData {
    /// Defaults to the slug of `name`.
    pub id: Option<String>,
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryData {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Dashboard counters over the whole store.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatistics {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub due_today: usize,
    pub overdue: usize,
    pub completed_today: usize,
}
