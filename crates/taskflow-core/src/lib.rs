//! # Taskflow Core Library
//!
//! Task records, recurring task expansion and an in-memory task store for the
//! Taskflow dashboard.
//!
//! ## Features
//!
//! - **Recurring Tasks**: daily, weekly and monthly patterns with an interval,
//!   weekday selection, day-of-month or "Nth weekday" monthly modes, and
//!   end-by-date / end-after-N / never end conditions
//! - **Deterministic Expansion**: a recurrence always produces the same
//!   strictly increasing dates, bounded by an instance cap and an idle guard
//! - **Field-Level Validation**: every invalid form field is reported at once
//! - **Filtering**: boolean queries over category, priority, status, due date
//!   and free text
//!
//! ## Core Modules
//!
//! - [`dates`]: Calendar arithmetic on plain dates
//! - [`models`]: Tasks, categories and transfer objects
//! - [`recurrence`]: Recurrence form, typed rules, validator and expander
//! - [`query`]: Filter expressions and sort orders
//! - [`repository`]: Async data access layer with an in-memory store
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use taskflow_core::{
//!     models::{TaskPriority, TaskTemplate},
//!     recurrence::{EndType, Pattern, RecurrenceForm},
//!     repository::{InMemoryRepository, RecurringTaskRepository, StoreConfig},
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let repo = InMemoryRepository::new(StoreConfig::default());
//!     let today = Utc::now().date_naive();
//!
//!     let mut form = RecurrenceForm::new(Pattern::Weekly, today);
//!     form.days_of_week = vec!["monday".into(), "friday".into()];
//!     form.end_type = EndType::After;
//!     form.end_after = Some(10);
//!
//!     let template = TaskTemplate {
//!         title: "Team sync".to_string(),
//!         category: "work".to_string(),
//!         priority: TaskPriority::High,
//!         ..Default::default()
//!     };
//!
//!     let batch = repo.add_recurring_tasks(template, &form, today).await?;
//!     println!("Created {} tasks", batch.len());
//!
//!     Ok(())
//! }
//! ```

pub mod dates;
pub mod error;
pub mod models;
pub mod query;
pub mod recurrence;
pub mod repository;
