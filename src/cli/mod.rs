//! Command-line interface.

mod app;
mod reminders;
mod storage;
mod transactions;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub use app::App;

use crate::errors::CliError;

#[derive(Parser, Debug)]
#[command(name = "pursebook_cli", version)]
#[command(about = "Track income and expenses, with reminders to keep the record current")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record a transaction.
    Add(AddArgs),
    /// Change fields of a transaction.
    Edit(EditArgs),
    /// Delete a transaction.
    Remove {
        /// Transaction id, or a unique prefix of it.
        id: String,
    },
    /// List transactions, newest first.
    List {
        #[arg(long)]
        limit: Option<usize>,
        /// Print the raw JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Totals and the expense breakdown by category.
    Summary,
    /// Show the categories accepted for each kind.
    Categories {
        #[arg(long)]
        kind: Option<String>,
    },
    /// Import transactions from a CSV statement.
    Import(ImportArgs),
    /// Configure and run expense-logging reminders.
    Reminder {
        #[command(subcommand)]
        command: ReminderCommand,
    },
    /// List stored snapshots of a data key.
    Snapshots { key: String },
    /// Replace a data key with one of its snapshots.
    Restore { key: String, id: String },
    /// Print build information.
    Version,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// `income` or `expense`.
    pub kind: String,
    pub amount: String,
    pub category: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// `YYYY-MM-DD` or `DD/MM/YYYY`. Defaults to today.
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    pub id: String,
    #[arg(long)]
    pub amount: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long, conflicts_with = "clear_notes")]
    pub notes: Option<String>,
    #[arg(long)]
    pub clear_notes: bool,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// CSV file with a `date,kind,amount,category,description,notes` header.
    #[arg(required_unless_present = "sample", conflicts_with = "sample")]
    pub path: Option<PathBuf>,
    /// Import the built-in sample statement.
    #[arg(long)]
    pub sample: bool,
}

#[derive(Subcommand, Debug)]
pub enum ReminderCommand {
    /// Show the reminder settings and the next expected reminder.
    Show,
    /// Change cadence and times of day.
    Set(SetArgs),
    AddTime { time: String },
    RemoveTime { time: String },
    /// Turn reminders on, asking for notification permission if needed.
    Enable,
    Disable,
    /// Send a test notification.
    Test,
    /// Run a single reminder check now.
    Check,
    /// Keep checking until interrupted.
    Watch {
        #[arg(long)]
        interval_secs: Option<u64>,
    },
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Days between reminders.
    #[arg(long)]
    pub cadence: Option<u32>,
    /// Comma-separated `HH:MM` list replacing the current times.
    #[arg(long, value_delimiter = ',')]
    pub times: Option<Vec<String>>,
    /// Restore default cadence and times.
    #[arg(long, conflicts_with_all = ["cadence", "times"])]
    pub reset: bool,
}

/// Parses arguments from the process and runs the command.
pub fn run_cli() -> Result<(), CliError> {
    run(Cli::parse())
}

pub fn run(cli: Cli) -> Result<(), CliError> {
    if let Command::Version = cli.command {
        return storage::version();
    }
    let mut app = App::open()?;
    match cli.command {
        Command::Add(args) => transactions::add(&mut app, args),
        Command::Edit(args) => transactions::edit(&mut app, args),
        Command::Remove { id } => transactions::remove(&mut app, &id),
        Command::List { limit, json } => transactions::list(&app, limit, json),
        Command::Summary => transactions::summary(&app),
        Command::Categories { kind } => transactions::categories(kind.as_deref()),
        Command::Import(args) => transactions::import(&mut app, args),
        Command::Reminder { command } => reminders::run(&app, command),
        Command::Snapshots { key } => storage::snapshots(&app, &key),
        Command::Restore { key, id } => storage::restore(&app, &key, &id),
        Command::Version => storage::version(),
    }
}
