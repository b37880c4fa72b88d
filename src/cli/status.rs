use colored::Colorize;

use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::{format_bytes, money};
use crate::settings::load_settings;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let db_path = settings.db_path();

    println!("Data dir:   {}", settings.data_dir);
    println!("Database:   {}", db_path.display());
    println!("Model:      {}", settings.model());
    let key_state = if settings.api_key().is_some() {
        "configured".green()
    } else {
        "not set".yellow()
    };
    println!("API key:    {key_state}");

    if db_path.exists() {
        let size = std::fs::metadata(&db_path)?.len();
        println!("DB size:    {}", format_bytes(size));

        let conn = get_connection(&db_path)?;
        let accounts: i64 = conn.query_row("SELECT count(*) FROM accounts", [], |r| r.get(0))?;
        let items: i64 = conn.query_row("SELECT count(*) FROM items", [], |r| r.get(0))?;
        let total: f64 = conn.query_row("SELECT COALESCE(SUM(price), 0.0) FROM items", [], |r| r.get(0))?;
        let imports: i64 = conn.query_row("SELECT count(*) FROM imports", [], |r| r.get(0))?;

        println!();
        println!("Accounts:   {accounts}");
        println!("Items:      {items}");
        println!("Total:      {}", money(total));
        println!("Imports:    {imports}");
    } else {
        println!();
        println!("Database not found. Run `billbook init` to set up.");
    }

    Ok(())
}
