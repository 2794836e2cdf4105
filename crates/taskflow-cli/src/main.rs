use anyhow::Context;
use chrono::Local;
use clap::Parser;
use owo_colors::{OwoColorize, Style};
use taskflow_core::error::CoreError;
use taskflow_core::repository::InMemoryRepository;
use tracing::debug;

mod cli;
mod commands;
mod config;
mod parser;
mod query_parser;
mod views;

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("TASKFLOW_LOG").add_directive(level.into()))
        .init();
}

fn open_repository(cli: &cli::Cli, config: &config::Config) -> anyhow::Result<InMemoryRepository> {
    let repo = match cli.data.as_ref().or(config.data_file.as_ref()) {
        Some(path) => InMemoryRepository::from_seed_file(path, config.store)
            .with_context(|| format!("Failed to load data file {}", path.display()))?,
        None => InMemoryRepository::new(config.store),
    };
    Ok(repo.with_expansion_limits(config.expansion))
}

async fn run(cli: cli::Cli) -> anyhow::Result<()> {
    let config = config::Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    debug!(?config, "configuration loaded");

    let today = Local::now().date_naive();
    let repository = open_repository(&cli, &config)?;

    match cli.command {
        cli::Commands::Add(command) => commands::add::add_task(&repository, command, today).await,
        cli::Commands::Preview(command) => commands::preview::preview(command, &config, today),
        cli::Commands::List(command) => {
            commands::list::list_tasks(&repository, command, &config, today).await
        }
        cli::Commands::Stats => commands::stats::show_stats(&repository, today).await,
        cli::Commands::Category(command) => {
            commands::category::category_command(&repository, command).await
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    setup_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        handle_error(e);
        std::process::exit(1);
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.chain().find_map(|e| e.downcast_ref::<CoreError>()) {
        match core_error {
            CoreError::Configuration(errors) => {
                eprintln!("{} Invalid recurrence settings:", "Error:".style(error_style));
                for (field, message) in errors.iter() {
                    eprintln!("  {} {}: {}", "•".red(), field.yellow(), message);
                }
            }
            CoreError::NotFound(s) => {
                eprintln!("{} {}", "Error:".style(error_style), s);
            }
            CoreError::InvalidInput(s) => {
                eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
            }
            _ => eprintln!("{} {:#}", "Error:".style(error_style), err),
        }
    } else if let Some(query_error) = err.downcast_ref::<query_parser::QueryParseError>() {
        eprintln!("{} Invalid query: {}", "Error:".style(error_style), query_error);
    } else {
        eprintln!("{} {:#}", "Error:".style(error_style), err);
    }
}
