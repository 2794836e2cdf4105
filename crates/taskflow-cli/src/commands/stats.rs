use anyhow::Result;
use chrono::NaiveDate;
use taskflow_core::repository::Repository;

use crate::views::table::display_statistics;

pub async fn show_stats(repo: &impl Repository, today: NaiveDate) -> Result<()> {
    let stats = repo.task_statistics(today).await?;
    display_statistics(&stats);
    Ok(())
}
