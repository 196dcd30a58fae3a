pub mod entry;
pub mod init;
pub mod month;
pub mod rule;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rusqlite::Connection;

use crate::db::{get_connection, init_db, DB_FILE};
use crate::error::{BudgetError, Result};
use crate::settings::get_data_dir;

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| BudgetError::InvalidDate(s.to_string()))
}

pub(crate) fn parse_month(s: &str) -> Result<(i32, u32)> {
    let parts: Vec<&str> = s.split('-').collect();
    if parts.len() == 2 {
        if let (Ok(year), Ok(month)) = (parts[0].parse(), parts[1].parse()) {
            if (1..=12).contains(&month) {
                return Ok((year, month));
            }
        }
    }
    Err(BudgetError::InvalidDate(s.to_string()))
}

/// Open the ledger database, running migrations the way the app does on
/// every start.
pub(crate) fn open_db() -> Result<Connection> {
    let conn = get_connection(&get_data_dir().join(DB_FILE))?;
    init_db(&conn)?;
    Ok(conn)
}

#[derive(Parser)]
#[command(name = "easybudget", about = "Calendar budget ledger with recurring payments.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up EasyBudget: choose a data directory and initialize the database.
    Init {
        /// Path for EasyBudget data (default: ~/.easybudget)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Record a manual entry.
    Add {
        /// Entry date: YYYY-MM-DD
        date: String,
        /// Amount in dollars, e.g. -12.34 for an expense
        #[arg(allow_negative_numbers = true)]
        amount: String,
        /// Free-text note
        #[arg(long, default_value = "")]
        note: String,
    },
    /// Edit an existing entry's date, amount, or note.
    Edit {
        /// Entry ID (shown in `easybudget day`)
        id: i64,
        /// New date: YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
        /// New amount in dollars
        #[arg(long, allow_negative_numbers = true)]
        amount: Option<String>,
        /// New note
        #[arg(long)]
        note: Option<String>,
    },
    /// Delete one entry.
    Rm {
        /// Entry ID
        id: i64,
    },
    /// Show all entries on a day plus the ending balance.
    Day {
        /// Date: YYYY-MM-DD
        date: String,
    },
    /// Show per-day totals and running balances for a month.
    Month {
        /// Month: YYYY-MM
        month: String,
    },
    /// Show the balance through a date.
    Balance {
        /// Date: YYYY-MM-DD
        date: String,
    },
    /// Manage recurring rules.
    Rules {
        #[command(subcommand)]
        command: RulesCommands,
    },
    /// Expand every recurring rule up to a horizon date.
    Generate {
        /// Horizon date: YYYY-MM-DD
        #[arg(long)]
        through: String,
    },
}

#[derive(Subcommand)]
pub enum RulesCommands {
    /// Add a recurring rule and expand it.
    Add {
        /// First occurrence date: YYYY-MM-DD
        start: String,
        /// Amount in dollars, e.g. -1200 for rent
        #[arg(allow_negative_numbers = true)]
        amount: String,
        /// Free-text note copied onto every generated entry
        #[arg(long, default_value = "")]
        note: String,
        /// Repeat every N units
        #[arg(long, default_value = "1")]
        every: i64,
        /// Repeat unit: day, week, month
        #[arg(long)]
        unit: String,
        /// Expand through this date (default: configured months ahead)
        #[arg(long)]
        through: Option<String>,
    },
    /// List all recurring rules.
    List,
    /// Delete a rule and every entry it generated.
    Rm {
        /// Rule ID (shown in `easybudget rules list`)
        id: i64,
    },
}
