pub mod accounts;
pub mod categories;
pub mod config;
pub mod extract;
pub mod files;
pub mod init;
pub mod items;
pub mod status;
pub mod totals;

use clap::{Parser, Subcommand};
use rusqlite::Connection;

use crate::db::{get_connection, init_db};
use crate::error::{BillbookError, Result};
use crate::settings::load_settings;

/// Open the ledger database configured in settings, bringing its schema up to date.
pub(crate) fn open_ledger() -> Result<Connection> {
    let db_path = load_settings().db_path();
    if !db_path.exists() {
        return Err(BillbookError::Settings(format!(
            "No database found at {}\nRun `billbook init` to set up.",
            db_path.display()
        )));
    }
    let conn = get_connection(&db_path)?;
    init_db(&conn)?;
    Ok(conn)
}

#[derive(Parser)]
#[command(name = "billbook", version, about = "Account ledger with bill and receipt extraction.")]
pub struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and initialize the database.
    Init {
        /// Path for billbook data (default: ~/Documents/billbook)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Manage accounts.
    Accounts {
        #[command(subcommand)]
        command: AccountsCommands,
    },
    /// Manage ledger items.
    Items {
        #[command(subcommand)]
        command: ItemsCommands,
    },
    /// Manage the category vocabulary used for extraction.
    Categories {
        #[command(subcommand)]
        command: CategoriesCommands,
    },
    /// Show per-account totals and the grand total.
    Totals,
    /// Extract a bill or receipt and print it as JSON.
    Extract {
        /// PDF, image or text file
        file: String,
        /// Allowed category (repeatable; default: ledger categories)
        #[arg(long = "category")]
        categories: Vec<String>,
    },
    /// Archive a bill, extract it, and optionally record its items.
    Import {
        /// PDF, image or text file
        file: String,
        /// Record extracted line items against this account
        #[arg(long)]
        account: Option<String>,
        /// Allowed category (repeatable; default: ledger categories)
        #[arg(long = "category")]
        categories: Vec<String>,
        /// Import even if the same file was imported before
        #[arg(long)]
        force: bool,
    },
    /// List archived bill files for a day.
    Files {
        /// Date: YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Show or change extraction settings.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Show current database and summary statistics.
    Status,
}

#[derive(Subcommand)]
pub enum AccountsCommands {
    /// Add a new account.
    Add {
        /// Account name, e.g. 'Household'
        name: String,
    },
    /// List all accounts.
    List,
    /// Rename an account; its items move with it.
    Rename {
        old: String,
        new: String,
    },
    /// Remove an account and all of its items.
    Remove {
        name: String,
    },
}

#[derive(Subcommand)]
pub enum ItemsCommands {
    /// Record an item against an account.
    Add {
        /// Account name
        #[arg(long)]
        account: String,
        /// Item description
        description: String,
        /// Price
        #[arg(long)]
        price: f64,
        /// Category name
        #[arg(long)]
        category: Option<String>,
    },
    /// List items, optionally for one account.
    List {
        #[arg(long)]
        account: Option<String>,
    },
    /// Change an existing item.
    Edit {
        /// Item ID (shown in `billbook items list`)
        id: i64,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        account: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Delete an item by ID.
    Remove {
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum CategoriesCommands {
    /// Add a category.
    Add { name: String },
    /// List categories in the order handed to the extractor.
    List,
    /// Remove a category.
    Remove { name: String },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show extraction settings.
    Show,
    /// Store the OpenAI API key.
    SetKey { key: String },
    /// Set the model used for extraction.
    SetModel { model: String },
    /// Set the API base URL.
    SetBaseUrl { url: String },
    /// Write the built-in prompt to the template path for editing.
    InitPrompt {
        /// Overwrite an existing template
        #[arg(long)]
        force: bool,
    },
}
