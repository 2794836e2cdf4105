use anyhow::Result;
use chrono::NaiveDate;
use taskflow_core::repository::Repository;

use crate::cli::ListCommand;
use crate::config::Config;
use crate::query_parser::parse_query;
use crate::views::table::display_tasks;

pub async fn list_tasks(repo: &impl Repository, command: ListCommand, config: &Config, today: NaiveDate) -> Result<()> {
    let query_string = if command.query.trim().is_empty() {
        config.default_query_string()
    } else {
        command.query
    };

    let query = parse_query(&query_string, today)?;
    let tasks = repo.find_tasks(&query, command.sort, today).await?;
    display_tasks(&tasks, today);
    Ok(())
}
