//! todo CLI - manage a todo list stored as JSON.

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use todocli::{
    Config, ConfigStorage, Filter, Priority, PrefixMatch, Stats, StorageBuilderExt, Todo, TodoStorage, resolve_prefix,
    sort_by_config, sort_for_display,
};

mod cli;

use cli::{Cli, Command, ConfigCommand};

fn setup_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("todocli")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("todocli.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn format_priority(priority: Priority, width: usize) -> ColoredString {
    let text = format!("{:<width$}", priority.as_str());
    match priority {
        Priority::High => text.red(),
        Priority::Medium => text.yellow(),
        Priority::Low => text.green(),
    }
}

fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

/// `2024-03-01T09:30:00.123456` -> `2024-03-01 09:30:00`
fn short_timestamp(timestamp: &str) -> String {
    timestamp.chars().take(19).collect::<String>().replace('T', " ")
}

/// Resolve an id prefix to exactly one todo, or report and exit.
fn resolve_one(storage: &TodoStorage, prefix: &str) -> Result<Todo> {
    let todos = storage.load().context("Failed to load todos")?;
    match resolve_prefix(&todos, prefix) {
        PrefixMatch::One(todo) => Ok(todo),
        PrefixMatch::None => {
            eprintln!("{} Todo not found: {}", "✗".red(), prefix);
            std::process::exit(1);
        }
        PrefixMatch::Many(count) => {
            eprintln!(
                "{} {} todos match '{}'. Be more specific.",
                "!".yellow(),
                count,
                prefix
            );
            std::process::exit(1);
        }
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N]: ", prompt);
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut answer = String::new();
    io::stdin()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn print_table(todos: &[Todo]) {
    let title_width = todos
        .iter()
        .map(|t| t.title.chars().count())
        .max()
        .unwrap_or(0)
        .max("Title".len());

    println!(
        "{}",
        format!(
            "{:<8}  {:<3}  {:<title_width$}  {:<8}  {:<12}  {}",
            "ID", "✓", "Title", "Priority", "Category", "Due Date"
        )
        .bold()
        .magenta()
    );

    for todo in todos {
        let status = if todo.completed { "[✓]".green() } else { "[ ]".normal() };
        let title = format!("{:<title_width$}", todo.title);
        let title = if todo.completed { title.dimmed() } else { title.normal() };
        let category = if todo.category.is_empty() { "-" } else { todo.category.as_str() };
        let due = match &todo.due_date {
            Some(due) if todo.is_overdue() => format!("{} ⚠", due).red(),
            Some(due) => due.normal(),
            None => "-".normal(),
        };

        println!(
            "{}  {}  {}  {}  {:<12}  {}",
            short_id(&todo.id).dimmed(),
            status,
            title,
            format_priority(todo.priority, 8),
            category,
            due
        );
    }

    let completed = todos.iter().filter(|t| t.completed).count();
    println!(
        "\n{}",
        format!(
            "Total: {} task(s) | Active: {} | Completed: {}",
            todos.len(),
            todos.len() - completed,
            completed
        )
        .dimmed()
    );
}

fn print_details(todo: &Todo) {
    let status = if todo.completed {
        "✓ Completed".green()
    } else {
        "⏸ Active".yellow()
    };

    println!("{}: {}", "ID".bold().cyan(), todo.id);
    println!("{}: {}", "Title".bold().cyan(), todo.title);
    println!("{}: {}", "Status".bold().cyan(), status);
    if !todo.description.is_empty() {
        println!("{}: {}", "Description".bold().cyan(), todo.description);
    }
    println!("{}: {}", "Priority".bold().cyan(), format_priority(todo.priority, 0));
    if !todo.category.is_empty() {
        println!("{}: {}", "Category".bold().cyan(), todo.category);
    }
    if let Some(due) = &todo.due_date {
        let due = if todo.is_overdue() {
            format!("{} (Overdue!)", due).red()
        } else {
            due.normal()
        };
        println!("{}: {}", "Due Date".bold().cyan(), due);
    }
    println!("{}: {}", "Created".bold().cyan(), short_timestamp(&todo.created_at));
    if let Some(completed_at) = &todo.completed_at {
        println!("{}: {}", "Completed".bold().cyan(), short_timestamp(completed_at));
    }
}

fn print_stats(stats: &Stats) {
    let row = |label: &str, value: ColoredString| println!("{:<18}{:>8}", label.bold(), value);

    row("Total Tasks", stats.total.to_string().normal());
    row("Active Tasks", stats.active.to_string().yellow());
    row("Completed Tasks", stats.completed.to_string().green());
    row("Completion Rate", format!("{:.1}%", stats.completion_rate()).normal());
    println!();
    row("High Priority", stats.high.to_string().red());
    row("Medium Priority", stats.medium.to_string().yellow());
    row("Low Priority", stats.low.to_string().green());

    if stats.overdue > 0 {
        println!();
        row("Overdue Tasks", format!("{} ⚠", stats.overdue).red().bold());
    }

    if !stats.categories.is_empty() {
        println!("\n{}", "Active Tasks by Category:".bold());
        for (category, count) in &stats.categories {
            println!("  • {}: {}", category, count);
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_storage = cli
        .config
        .map(ConfigStorage::new)
        .unwrap_or_else(ConfigStorage::open_default);
    let config = config_storage.load();
    let storage = cli
        .file
        .map(TodoStorage::new)
        .unwrap_or_else(|| TodoStorage::new(&config.data_file));
    info!("Using data file {}", storage.path().display());

    match cli.command {
        Command::Add {
            title,
            description,
            priority,
            category,
            due,
        } => {
            let mut builder = storage
                .build(&title)
                .description(description)
                .priority(priority.map(Priority::from).unwrap_or(config.default_priority))
                .category(category);
            if let Some(due) = due {
                builder = builder.due_date(due);
            }

            let todo = builder.create()?;
            println!("{} Added: {} {}", "✓".green(), short_id(&todo.id).cyan(), todo.title);
        }

        Command::List {
            show_all,
            category,
            priority,
            sort,
        } => {
            let mut filter = Filter::for_listing(show_all, &config);
            if let Some(category) = category {
                filter = filter.category(category);
            }
            if let Some(priority) = priority {
                filter = filter.priority(priority.into());
            }

            let mut todos = filter.apply(storage.list().context("Failed to list todos")?);

            if todos.is_empty() {
                println!("{}", "No tasks found".yellow());
            } else {
                if sort {
                    sort_by_config(&mut todos, config.sort_by, config.sort_order);
                } else {
                    sort_for_display(&mut todos);
                }
                print_table(&todos);
            }
        }

        Command::Complete { id } => {
            let mut todo = resolve_one(&storage, &id)?;
            todo.mark_completed();

            if storage.update(&todo).context("Failed to complete todo")? {
                println!("{} Completed: {}", "✓".green(), todo.title);
            } else {
                eprintln!("{} Failed to update todo", "✗".red());
                std::process::exit(1);
            }
        }

        Command::Uncomplete { id } => {
            let mut todo = resolve_one(&storage, &id)?;
            todo.mark_incomplete();

            if storage.update(&todo).context("Failed to reopen todo")? {
                println!("{} Reopened: {}", "✓".green(), todo.title);
            } else {
                eprintln!("{} Failed to update todo", "✗".red());
                std::process::exit(1);
            }
        }

        Command::Delete { id, yes } => {
            let todo = resolve_one(&storage, &id)?;

            if !yes && !confirm("Are you sure you want to delete this todo?")? {
                println!("{}", "Aborted!".dimmed());
                return Ok(());
            }

            if storage.delete(&todo.id).context("Failed to delete todo")? {
                println!("{} Deleted: {}", "✓".green(), todo.title);
            } else {
                eprintln!("{} Failed to delete todo", "✗".red());
                std::process::exit(1);
            }
        }

        Command::Clear { yes } => {
            if !yes && !confirm("Are you sure you want to clear all completed todos?")? {
                println!("{}", "Aborted!".dimmed());
                return Ok(());
            }

            let count = storage.clear_completed().context("Failed to clear todos")?;
            println!("{} Cleared {} completed todo(s)", "✓".green(), count);
        }

        Command::Stats => {
            let todos = storage.load().context("Failed to load todos")?;
            print_stats(&Stats::from_todos(&todos));
        }

        Command::Show { id } => {
            let todo = resolve_one(&storage, &id)?;
            print_details(&todo);
        }

        Command::Config(ConfigCommand::Show) => {
            println!("{}: {}", "Config file".bold(), config_storage.path().display());
            for key in Config::KEYS {
                println!("  {}: {}", key.cyan(), config.get(key)?);
            }
        }

        Command::Config(ConfigCommand::Set { key, value }) => {
            let mut config = config;
            config.set(&key, &value).context("Failed to update config")?;
            config_storage.save(&config).context("Failed to save config")?;
            println!("{} {} = {}", "✓".green(), key.cyan(), value);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    info!("Command: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
