use crate::error::CoreError;
use crate::models::{
    Category, NewCategoryData, NewTaskData, RecurringBatch, Task, TaskStatistics, TaskTemplate,
    UpdateCategoryData, UpdateTaskData,
};
use crate::query::{Query, SortBy};
use crate::recurrence::{ExpansionLimits, RecurrenceExpander, RecurrenceForm};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

pub mod categories;
pub mod recurring;
pub mod seed;
pub mod tasks;

pub use seed::SeedData;

/// Domain-specific trait for single task operations
#[async_trait]
pub trait TaskRepository {
    async fn add_task(&self, data: NewTaskData) -> Result<Task, CoreError>;
    async fn find_task_by_id(&self, id: Uuid) -> Result<Option<Task>, CoreError>;
    async fn find_tasks(&self, query: &Query, sort: SortBy, today: NaiveDate) -> Result<Vec<Task>, CoreError>;
    async fn update_task(&self, id: Uuid, data: UpdateTaskData) -> Result<Task, CoreError>;
    async fn toggle_task(&self, id: Uuid, now: DateTime<Utc>) -> Result<Task, CoreError>;
    async fn delete_task(&self, id: Uuid) -> Result<(), CoreError>;
    async fn task_statistics(&self, today: NaiveDate) -> Result<TaskStatistics, CoreError>;
}

/// Domain-specific trait for recurring task groups
#[async_trait]
pub trait RecurringTaskRepository {
    /// Validate `form`, expand it and append every instance in one step.
    async fn add_recurring_tasks(
        &self,
        template: TaskTemplate,
        form: &RecurrenceForm,
        today: NaiveDate,
    ) -> Result<RecurringBatch, CoreError>;
    async fn find_recurring_group(&self, recurring_task_id: Uuid) -> Result<Vec<Task>, CoreError>;
    async fn delete_recurring_group(&self, recurring_task_id: Uuid) -> Result<usize, CoreError>;
}

/// Domain-specific trait for category operations
#[async_trait]
pub trait CategoryRepository {
    async fn add_category(&self, data: NewCategoryData) -> Result<Category, CoreError>;
    async fn find_categories(&self) -> Result<Vec<Category>, CoreError>;
    async fn find_category_by_id(&self, id: &str) -> Result<Option<Category>, CoreError>;
    async fn update_category(&self, id: &str, data: UpdateCategoryData) -> Result<Category, CoreError>;
    async fn delete_category(&self, id: &str) -> Result<(), CoreError>;
}

/// Main repository trait that composes all domain traits
#[async_trait]
pub trait Repository: TaskRepository + RecurringTaskRepository + CategoryRepository {}

/// Store behaviour knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Artificial delay before each call, in milliseconds. Zero disables it.
    #[serde(default)]
    pub latency_ms: u64,
}

/// Records in insertion order.
#[derive(Debug)]
pub(crate) struct Table<K, V> {
    rows: HashMap<K, V>,
    order: Vec<K>,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<K: std::hash::Hash + Eq + Clone, V> Table<K, V> {
    pub(crate) fn insert(&mut self, key: K, value: V) {
        if self.rows.insert(key.clone(), value).is_none() {
            self.order.push(key);
        }
    }

    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        self.rows.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.rows.get_mut(key)
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        self.rows.contains_key(key)
    }

    pub(crate) fn remove(&mut self, key: &K) -> Option<V> {
        let removed = self.rows.remove(key)?;
        self.order.retain(|k| k != key);
        Some(removed)
    }

    /// Remove every row matching `predicate`, returning how many went.
    pub(crate) fn remove_where(&mut self, mut predicate: impl FnMut(&V) -> bool) -> usize {
        let before = self.order.len();
        let rows = &mut self.rows;
        self.order.retain(|key| {
            let drop = rows.get(key).map_or(false, &mut predicate);
            if drop {
                rows.remove(key);
            }
            !drop
        });
        before - self.order.len()
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.order.iter().filter_map(move |k| self.rows.get(k))
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }
}

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) tasks: Table<Uuid, Task>,
    pub(crate) categories: Table<String, Category>,
}

/// In-memory implementation of the repository pattern
///
/// Each call takes the table lock once, so a recurring batch is appended
/// in full or not at all and readers never see half of it.
#[derive(Debug)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
    config: StoreConfig,
    expander: RecurrenceExpander,
}

impl InMemoryRepository {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            config,
            expander: RecurrenceExpander::default(),
        }
    }

    pub fn with_expansion_limits(mut self, limits: ExpansionLimits) -> Self {
        self.expander = RecurrenceExpander::new(limits);
        self
    }

    /// Build a store pre-populated with `seed`.
    pub fn from_seed(seed: SeedData, config: StoreConfig) -> Result<Self, CoreError> {
        let tables = seed.into_tables()?;
        Ok(Self {
            tables: RwLock::new(tables),
            config,
            expander: RecurrenceExpander::default(),
        })
    }

    /// Load a JSON seed file (`{"tasks": [...], "categories": [...]}`).
    pub fn from_seed_file(path: impl AsRef<Path>, config: StoreConfig) -> Result<Self, CoreError> {
        let seed = SeedData::load(path)?;
        Self::from_seed(seed, config)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn expander(&self) -> &RecurrenceExpander {
        &self.expander
    }

    /// Snapshot of the current contents, in insertion order.
    pub async fn export(&self) -> SeedData {
        let tables = self.tables.read().await;
        let mut tasks = Vec::with_capacity(tables.tasks.len());
        tasks.extend(tables.tasks.values().cloned());
        SeedData {
            tasks,
            categories: tables.categories.values().cloned().collect(),
        }
    }

    pub(crate) fn tables(&self) -> &RwLock<Tables> {
        &self.tables
    }

    pub(crate) async fn simulate_latency(&self) {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl Repository for InMemoryRepository {}
