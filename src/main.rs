//! HeartGarden - garden companion
//!
//! CLI entry point for chatting with the companion and browsing the catalogs.

use std::fs;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::info;

use heartgarden::cli::{Cli, Command, OutputFormat, get_log_path};
use heartgarden::config::Config;
use heartgarden::domain::{Mood, TaskCategory};
use heartgarden::terminal;

fn setup_logging(verbose: bool) -> Result<()> {
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Write to the log file so the terminal stays clean for the conversation
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!(
        "HeartGarden loaded config: provider={}, model={}",
        config.llm.provider, config.llm.model
    );

    match cli.command {
        Some(Command::Chat { skip_to_tasks }) => terminal::run_interactive(&config, skip_to_tasks).await,
        Some(Command::Moods { format }) => cmd_moods(format),
        Some(Command::Tasks { category, format }) => cmd_tasks(category.as_deref(), format),
        Some(Command::Config) => cmd_config(&config),
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}

/// Print the mood scale, marking the default
fn cmd_moods(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let moods: Vec<_> = Mood::ALL
                .iter()
                .map(|m| {
                    serde_json::json!({
                        "id": m.id(),
                        "label": m.label(),
                        "default": *m == Mood::DEFAULT,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&moods)?);
        }
        OutputFormat::Text => {
            println!("{}", "How are you feeling today?".bold());
            for (i, mood) in Mood::ALL.iter().enumerate() {
                let marker = if *mood == Mood::DEFAULT { " (default)" } else { "" };
                println!("  {}. {:<6} {}{}", i + 1, mood.label(), mood.id().dimmed(), marker);
            }
        }
    }
    Ok(())
}

/// Print one category's activities, or every category's
fn cmd_tasks(category: Option<&str>, format: OutputFormat) -> Result<()> {
    let categories: Vec<TaskCategory> = match category {
        Some(raw) => {
            let parsed = TaskCategory::parse_or_default(raw);
            if parsed.id() != raw.trim().to_lowercase() && format == OutputFormat::Text {
                println!(
                    "{} Unknown category '{}', showing {}",
                    "note:".yellow(),
                    raw,
                    parsed.label()
                );
            }
            vec![parsed]
        }
        None => TaskCategory::ALL.to_vec(),
    };

    match format {
        OutputFormat::Json => {
            let listing: Vec<_> = categories
                .iter()
                .map(|c| {
                    let activities: Vec<_> = c
                        .activities()
                        .iter()
                        .map(|a| serde_json::json!({ "id": a.id, "title": a.title }))
                        .collect();
                    serde_json::json!({
                        "id": c.id(),
                        "label": c.label(),
                        "timed": c.is_timed(),
                        "activities": activities,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        OutputFormat::Text => {
            for (i, c) in categories.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                println!("{}", c.list_title().bold());
                for activity in c.activities() {
                    println!("  {}. {}", activity.id, activity.title);
                }
            }
        }
    }
    Ok(())
}

/// Print the resolved configuration as YAML
fn cmd_config(config: &Config) -> Result<()> {
    let yaml = serde_yaml::to_string(config).context("Failed to serialize configuration")?;
    print!("{}", yaml);
    Ok(())
}
