use crate::error::CoreError;
use crate::models::{RecurringBatch, Task, TaskTemplate};
use crate::recurrence::{Recurrence, RecurrenceForm};
use crate::repository::tasks::check_title;
use crate::repository::InMemoryRepository;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

#[async_trait]
impl super::RecurringTaskRepository for InMemoryRepository {
    async fn add_recurring_tasks(
        &self,
        template: TaskTemplate,
        form: &RecurrenceForm,
        today: NaiveDate,
    ) -> Result<RecurringBatch, CoreError> {
        self.simulate_latency().await;
        check_title(&template.title)?;

        let recurrence = Recurrence::from_form(form, today)?;
        let batch = self.expander().expand(&template, &recurrence, Utc::now())?;

        if batch.is_empty() {
            info!(%recurrence, "recurrence produced no occurrences");
            return Ok(batch);
        }

        let mut tables = self.tables().write().await;
        for task in &batch.tasks {
            tables.tasks.insert(task.id, task.clone());
        }
        debug!(
            recurring_task_id = %batch.recurring_task_id,
            count = batch.len(),
            "recurring tasks added"
        );
        Ok(batch)
    }

    async fn find_recurring_group(&self, recurring_task_id: Uuid) -> Result<Vec<Task>, CoreError> {
        self.simulate_latency().await;
        let tables = self.tables().read().await;
        let mut tasks: Vec<Task> = tables
            .tasks
            .values()
            .filter(|t| t.recurring_task_id == Some(recurring_task_id))
            .cloned()
            .collect();
        tasks.sort_by_key(|t| t.recurring_instance);
        Ok(tasks)
    }

    async fn delete_recurring_group(&self, recurring_task_id: Uuid) -> Result<usize, CoreError> {
        self.simulate_latency().await;
        let mut tables = self.tables().write().await;
        let removed = tables
            .tasks
            .remove_where(|t| t.recurring_task_id == Some(recurring_task_id));

        if removed == 0 {
            return Err(CoreError::NotFound(format!(
                "Recurring task group {} not found",
                recurring_task_id
            )));
        }
        debug!(%recurring_task_id, removed, "recurring group deleted");
        Ok(removed)
    }
}
