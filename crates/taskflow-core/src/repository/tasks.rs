use crate::error::CoreError;
use crate::models::{NewTaskData, Task, TaskStatistics, UpdateTaskData};
use crate::query::{Query, SortBy};
use crate::repository::InMemoryRepository;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;
use uuid::Uuid;

pub(crate) fn task_not_found(id: Uuid) -> CoreError {
    CoreError::NotFound(format!("Task {} not found", id))
}

pub(crate) fn check_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::InvalidInput("Task title cannot be empty".to_string()));
    }
    Ok(())
}

#[async_trait]
impl super::TaskRepository for InMemoryRepository {
    async fn add_task(&self, data: NewTaskData) -> Result<Task, CoreError> {
        self.simulate_latency().await;
        check_title(&data.title)?;

        let template = data.template();
        let task = Task {
            description: template.description,
            priority: template.priority,
            due_date: data.due_date,
            ..Task::new(template.title, template.category, Utc::now())
        };

        let mut tables = self.tables().write().await;
        tables.tasks.insert(task.id, task.clone());
        debug!(task_id = %task.id, "task added");
        Ok(task)
    }

    async fn find_task_by_id(&self, id: Uuid) -> Result<Option<Task>, CoreError> {
        self.simulate_latency().await;
        let tables = self.tables().read().await;
        Ok(tables.tasks.get(&id).cloned())
    }

    async fn find_tasks(&self, query: &Query, sort: SortBy, today: NaiveDate) -> Result<Vec<Task>, CoreError> {
        self.simulate_latency().await;
        let tables = self.tables().read().await;
        let mut tasks: Vec<Task> = tables
            .tasks
            .values()
            .filter(|task| query.matches(task, today))
            .cloned()
            .collect();
        sort.sort(&mut tasks);
        Ok(tasks)
    }

    async fn update_task(&self, id: Uuid, data: UpdateTaskData) -> Result<Task, CoreError> {
        self.simulate_latency().await;
        if let Some(title) = &data.title {
            check_title(title)?;
        }

        let mut tables = self.tables().write().await;
        let task = tables.tasks.get_mut(&id).ok_or_else(|| task_not_found(id))?;

        if let Some(title) = data.title {
            task.title = title;
        }
        if let Some(description) = data.description {
            task.description = description;
        }
        if let Some(category) = data.category {
            task.category = category;
        }
        if let Some(priority) = data.priority {
            task.priority = priority;
        }
        if let Some(due_date) = data.due_date {
            task.due_date = due_date;
        }
        if let Some(completed) = data.completed {
            if completed != task.completed {
                task.completed = completed;
                task.completed_at = completed.then(Utc::now);
            }
        }

        debug!(task_id = %id, "task updated");
        Ok(task.clone())
    }

    async fn toggle_task(&self, id: Uuid, now: DateTime<Utc>) -> Result<Task, CoreError> {
        self.simulate_latency().await;
        let mut tables = self.tables().write().await;
        let task = tables.tasks.get_mut(&id).ok_or_else(|| task_not_found(id))?;

        task.completed = !task.completed;
        task.completed_at = if task.completed { Some(now) } else { None };

        debug!(task_id = %id, completed = task.completed, "task toggled");
        Ok(task.clone())
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), CoreError> {
        self.simulate_latency().await;
        let mut tables = self.tables().write().await;
        tables.tasks.remove(&id).ok_or_else(|| task_not_found(id))?;
        debug!(task_id = %id, "task deleted");
        Ok(())
    }

    async fn task_statistics(&self, today: NaiveDate) -> Result<TaskStatistics, CoreError> {
        self.simulate_latency().await;
        let tables = self.tables().read().await;

        let mut stats = TaskStatistics::default();
        for task in tables.tasks.values() {
            stats.total += 1;
            if task.completed {
                stats.completed += 1;
                if task.completed_at.map_or(false, |at| at.date_naive() == today) {
                    stats.completed_today += 1;
                }
            } else {
                stats.pending += 1;
                if task.due_date == Some(today) {
                    stats.due_today += 1;
                }
                if task.is_overdue(today) {
                    stats.overdue += 1;
                }
            }
        }
        Ok(stats)
    }
}
