use anyhow::Result;
use taskflow_core::repository::Repository;

use crate::cli::{CategoryCommand, CategorySubcommand};
use crate::views::table::display_categories;

pub async fn category_command(repo: &impl Repository, command: CategoryCommand) -> Result<()> {
    match command.command {
        CategorySubcommand::List => {
            let categories = repo.find_categories().await?;
            display_categories(&categories);
        }
    }
    Ok(())
}
