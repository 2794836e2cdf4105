use chrono::NaiveDate;
use chrono_humanize::{Accuracy, HumanTime, Tense};
use comfy_table::{Attribute, Cell, Color, Row, Table};
use taskflow_core::models::{Category, Task, TaskPriority, TaskStatistics};

/// "today", "tomorrow", "in 3 days", "2 weeks ago"
pub fn humanize_due(due: NaiveDate, today: NaiveDate) -> String {
    match (due - today).num_days() {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        -1 => "yesterday".to_string(),
        _ => {
            let delta = due - today;
            let tense = if delta.num_days() > 0 { Tense::Future } else { Tense::Past };
            HumanTime::from(delta.abs()).to_text_en(Accuracy::Rough, tense)
        }
    }
}

fn short_id(task: &Task) -> String {
    task.id.simple().to_string()[..8].to_string()
}

pub fn display_tasks(tasks: &[Task], today: NaiveDate) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Category", "Priority", "Due Date", "Status"]);

    for task in tasks {
        let mut row = Row::new();
        row.add_cell(Cell::new(short_id(task)));

        let mut title = String::new();
        if let Some(instance) = task.recurring_instance {
            title.push('↻');
            title.push_str(&format!(" #{} ", instance));
        }
        title.push_str(&task.title);

        let mut title_cell = Cell::new(title);
        if task.completed {
            title_cell = title_cell.add_attribute(Attribute::CrossedOut).fg(Color::DarkGrey);
        } else {
            title_cell = match task.priority {
                TaskPriority::High => title_cell.fg(Color::Red).add_attribute(Attribute::Bold),
                TaskPriority::Medium => title_cell.fg(Color::Yellow),
                TaskPriority::Low => title_cell.fg(Color::Green),
            };
        }
        row.add_cell(title_cell);
        row.add_cell(Cell::new(&task.category));
        row.add_cell(Cell::new(task.priority.to_string()));

        let due_cell = match task.due_date {
            Some(due) => {
                let text = format!("{} ({})", due.format("%Y-%m-%d"), humanize_due(due, today));
                if task.is_overdue(today) {
                    Cell::new(text).fg(Color::Red)
                } else if !task.completed && due == today {
                    Cell::new(text).fg(Color::Yellow)
                } else {
                    Cell::new(text)
                }
            }
            None => Cell::new("None"),
        };
        row.add_cell(due_cell);

        let status_cell = if task.completed {
            Cell::new("Completed").fg(Color::Green)
        } else {
            Cell::new("Pending")
        };
        row.add_cell(status_cell);
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_categories(categories: &[Category]) {
    if categories.is_empty() {
        println!("No categories found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Color"]);

    for category in categories {
        let mut row = Row::new();
        row.add_cell(Cell::new(&category.id));
        row.add_cell(Cell::new(&category.name));
        row.add_cell(Cell::new(&category.color));
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_statistics(stats: &TaskStatistics) {
    let mut table = Table::new();
    table.set_header(vec!["Total", "Pending", "Completed", "Due Today", "Overdue", "Done Today"]);
    table.add_row(vec![
        Cell::new(stats.total),
        Cell::new(stats.pending),
        Cell::new(stats.completed).fg(Color::Green),
        Cell::new(stats.due_today).fg(Color::Yellow),
        Cell::new(stats.overdue).fg(Color::Red),
        Cell::new(stats.completed_today),
    ]);
    println!("{table}");
}
