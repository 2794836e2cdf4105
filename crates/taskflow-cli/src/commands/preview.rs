use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use owo_colors::OwoColorize;
use taskflow_core::dates::weekday_name;
use taskflow_core::recurrence::{Recurrence, RecurrenceExpander};

use crate::cli::PreviewCommand;
use crate::commands::recurrence::build_form;
use crate::config::Config;
use crate::views::table::humanize_due;

pub fn preview(command: PreviewCommand, config: &Config, today: NaiveDate) -> Result<()> {
    let form = build_form(&command.recurrence, today)?;
    let recurrence = Recurrence::from_form(&form, today)?;
    let limit = command.limit.unwrap_or(config.preview_count);

    let expander = RecurrenceExpander::new(config.expansion);
    let dates = expander.preview(&recurrence, limit)?;

    println!("{} {}", "Recurrence:".bold(), recurrence);
    if dates.is_empty() {
        println!("{} No occurrences with the current settings.", "!".yellow().bold());
        return Ok(());
    }

    for (i, date) in dates.iter().enumerate() {
        println!(
            "  {}. {} {} {}",
            i + 1,
            date.format("%Y-%m-%d").to_string().cyan(),
            weekday_name(date.weekday()),
            format!("({})", humanize_due(*date, today)).bright_black()
        );
    }
    Ok(())
}
