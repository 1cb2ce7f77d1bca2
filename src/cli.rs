//! CLI argument parsing for todo.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use todocli::Priority;

#[derive(Parser)]
#[command(
    name = "todo",
    about = "A feature-rich todo list manager",
    long_about = "Manage your tasks with priorities, categories, and due dates.",
    version,
    after_help = "Logs are written to: ~/.local/share/todocli/logs/todocli.log"
)]
pub struct Cli {
    /// Path to the todo data file (default: data_file from the config)
    #[arg(short = 'f', long, global = true)]
    pub file: Option<PathBuf>,

    /// Path to the config file (default: ~/.todocli/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Priority as accepted on the command line, case-insensitive.
#[derive(Clone, Copy, ValueEnum)]
pub enum PriorityArg {
    Low,
    Medium,
    High,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::High => Priority::High,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Add a new todo item
    Add {
        /// Task title
        title: String,

        /// Task description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Task priority (default: default_priority from the config)
        #[arg(short, long, value_enum, ignore_case = true)]
        priority: Option<PriorityArg>,

        /// Task category
        #[arg(short, long, default_value = "")]
        category: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },

    /// List todo items
    List {
        /// Show completed tasks
        #[arg(short = 'a', long = "all")]
        show_all: bool,

        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,

        /// Filter by priority
        #[arg(short, long, value_enum, ignore_case = true)]
        priority: Option<PriorityArg>,

        /// Order by the configured sort_by/sort_order instead of priority
        #[arg(long)]
        sort: bool,
    },

    /// Mark a todo as completed
    Complete {
        /// Task ID or unique prefix
        id: String,
    },

    /// Mark a completed todo as incomplete
    Uncomplete {
        /// Task ID or unique prefix
        id: String,
    },

    /// Delete a todo item
    Delete {
        /// Task ID or unique prefix
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Clear all completed todos
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show todo statistics
    Stats,

    /// Show detailed information about a todo
    Show {
        /// Task ID or unique prefix
        id: String,
    },

    /// View or change settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print every setting
    Show,

    /// Change one setting
    Set {
        /// Setting name (data_file, default_priority, show_completed, sort_by, sort_order)
        key: String,

        /// New value
        value: String,
    },
}
