mod cmd;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use mdtasks_core::config::ConfigLoader;

#[derive(Debug, Parser)]
#[command(
    name = "mdt",
    version = mdtasks_core::version(),
    about = "Task index over a markdown vault"
)]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true, default_value = "mdtasks.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List indexed tasks (scheduled ones by default)
    Tasks {
        /// Include done and undated tasks
        #[arg(long)]
        all: bool,
        /// Print full task ids instead of prefixes
        #[arg(long)]
        long: bool,
    },

    /// Mark a task done; recurring tasks roll forward
    Done { id: String },

    /// Move a task's due date
    Snooze {
        id: String,
        /// New due date (YYYY-MM-DD)
        date: String,
    },

    /// Delete a task's line from its note
    Remove { id: String },

    /// Append a task to the shared tasks file
    AddTask {
        text: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// none, low, medium or high
        #[arg(long)]
        priority: Option<String>,
        /// none, daily, weekly, monthly or yearly
        #[arg(long)]
        recurrence: Option<String>,
    },

    /// Create a new note in the notes directory
    NewNote {
        title: String,
        /// Note body; defaults to a title heading
        #[arg(long)]
        content: Option<String>,
    },

    /// Watch the vault and keep the index current until interrupted
    Watch {
        #[arg(long)]
        all: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let cf = ConfigLoader::load(&cli.config)?;
    logging::init(&cf.logging);

    match cli.command {
        Commands::Tasks { all, long } => cmd::tasks::run(&cf, all, long),
        Commands::Done { id } => cmd::mutate::done(&cf, &id),
        Commands::Snooze { id, date } => cmd::mutate::snooze(&cf, &id, &date),
        Commands::Remove { id } => cmd::mutate::remove(&cf, &id),
        Commands::AddTask { text, due, priority, recurrence } => {
            cmd::add::add_task(&cf, &text, due.as_deref(), priority.as_deref(), recurrence.as_deref())
        }
        Commands::NewNote { title, content } => {
            cmd::add::new_note(&cf, &title, content.as_deref())
        }
        Commands::Watch { all } => cmd::watch::run(&cf, all),
    }
}
