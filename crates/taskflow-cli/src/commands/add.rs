use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::{OwoColorize, Style};
use taskflow_core::models::{NewTaskData, Task};
use taskflow_core::repository::Repository;

use crate::cli::AddCommand;
use crate::commands::recurrence::build_form;
use crate::parser::parse_date;

pub async fn add_task(repo: &impl Repository, command: AddCommand, today: NaiveDate) -> Result<()> {
    let data = NewTaskData {
        title: command.title,
        description: command.description,
        category: command.category,
        priority: command.priority,
        due_date: command.due.as_deref().map(|d| parse_date(d, today)).transpose()?,
    };

    if command.recurrence.every.is_some() {
        let form = build_form(&command.recurrence, today)?;
        let batch = repo.add_recurring_tasks(data.template(), &form, today).await?;

        if command.json {
            println!("{}", serde_json::to_string_pretty(&batch)?);
            return Ok(());
        }

        if batch.is_empty() {
            println!(
                "{} No occurrences with the current settings; nothing was created.",
                "!".yellow().bold()
            );
            return Ok(());
        }

        print_recurring(&batch.tasks);
        return Ok(());
    }

    let task = repo.add_task(data).await?;
    if command.json {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        print_single(&task);
    }
    Ok(())
}

fn print_single(task: &Task) {
    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();

    println!("{} Created task: {}", "✓".style(success_style), task.title.bright_white().bold());
    println!("  {} Task ID: {}", "→".style(info_style), task.id.to_string().yellow());
    if let Some(due) = task.due_date {
        println!("  {} Due: {}", "→".style(info_style), due.format("%Y-%m-%d").to_string().cyan());
    }
}

fn print_recurring(tasks: &[Task]) {
    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();
    let subtle_style = Style::new().bright_black();

    let Some(first) = tasks.first() else {
        return;
    };

    println!(
        "{} Created {} recurring tasks: {}",
        "✓".style(success_style),
        tasks.len(),
        first.title.bright_white().bold()
    );
    if let Some(group) = first.recurring_task_id {
        println!("  {} Group ID: {}", "→".style(info_style), group.to_string().yellow());
    }

    let dates: Vec<String> = tasks
        .iter()
        .filter_map(|t| t.due_date)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect();
    let shown = dates.iter().take(5).cloned().collect::<Vec<_>>().join(", ");
    if dates.len() > 5 {
        println!(
            "  {} Due: {} {}",
            "→".style(info_style),
            shown.cyan(),
            format!("(+{} more)", dates.len() - 5).style(subtle_style)
        );
    } else {
        println!("  {} Due: {}", "→".style(info_style), shown.cyan());
    }
}
