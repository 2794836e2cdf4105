use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use taskflow_core::models::TaskPriority;
use taskflow_core::query::SortBy;
use taskflow_core::recurrence::{MonthlyType, Pattern};

/// Taskflow: a task dashboard with recurring task generation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a configuration file (defaults to ./taskflow.toml)
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,
    /// JSON seed file with tasks and categories
    #[clap(long, global = true)]
    pub data: Option<PathBuf>,
    /// Increase log output (-v info, -vv debug)
    #[clap(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add a task, or a recurring group of tasks with --every
    Add(AddCommand),
    /// Show the first dates a recurrence would produce
    Preview(PreviewCommand),
    /// List tasks
    List(ListCommand),
    /// Show task counters
    Stats,
    /// Manage categories
    Category(CategoryCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// The title of the task
    pub title: String,
    /// The description of the task
    #[clap(short, long)]
    pub description: Option<String>,
    /// The category id of the task
    #[clap(short, long)]
    pub category: Option<String>,
    /// The priority of the task (low, medium, high or 1-3)
    #[clap(short, long)]
    pub priority: Option<TaskPriority>,
    /// The due date of a one-off task
    #[clap(long, conflicts_with = "every")]
    pub due: Option<String>,
    #[command(flatten)]
    pub recurrence: RecurrenceArgs,
    /// Print the created tasks as JSON
    #[clap(long)]
    pub json: bool,
}

/// Flags describing a recurrence
#[derive(Args, Debug, Clone, Default)]
pub struct RecurrenceArgs {
    /// Recurrence pattern (daily, weekly, monthly)
    #[clap(long)]
    pub every: Option<Pattern>,
    /// Repeat every N days, weeks or months
    #[clap(long, default_value_t = 1, allow_negative_numbers = true)]
    pub frequency: i64,
    /// Days of the week for weekly patterns (e.g. mon,fri)
    #[clap(long, value_delimiter = ',')]
    pub on: Vec<String>,
    /// Day of the month for monthly patterns
    #[clap(long, allow_negative_numbers = true)]
    pub day_of_month: Option<i64>,
    /// How monthly patterns pick a day (day-of-month or week-of-month)
    #[clap(long)]
    pub monthly_type: Option<MonthlyType>,
    /// First eligible date (defaults to today)
    #[clap(long)]
    pub start: Option<String>,
    /// Last eligible date, inclusive
    #[clap(long, conflicts_with = "count")]
    pub until: Option<String>,
    /// Stop after this many occurrences
    #[clap(long, allow_negative_numbers = true)]
    pub count: Option<i64>,
}

#[derive(Parser, Debug, Clone)]
pub struct PreviewCommand {
    #[command(flatten)]
    pub recurrence: RecurrenceArgs,
    /// Number of dates to show (defaults to preview_count from the config)
    #[clap(short = 'n', long)]
    pub limit: Option<usize>,
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// A filter query string (e.g., "category:work and not status:completed")
    #[clap(default_value = "")]
    pub query: String,
    /// Sort order: due, priority or created
    #[clap(long, default_value = "due")]
    pub sort: SortBy,
}

#[derive(Parser, Debug, Clone)]
pub struct CategoryCommand {
    #[command(subcommand)]
    pub command: CategorySubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CategorySubcommand {
    /// List categories
    List,
}
