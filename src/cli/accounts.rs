use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::ledger;

use super::open_ledger;

pub fn add(name: &str) -> Result<()> {
    let conn = open_ledger()?;
    let account = ledger::add_account(&conn, name)?;
    println!("Added account: {}", account.name);
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = open_ledger()?;
    let accounts = ledger::list_accounts(&conn)?;
    if accounts.is_empty() {
        println!("No accounts yet. Add one with `billbook accounts add <NAME>`.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name"]);
    for account in accounts {
        table.add_row(vec![Cell::new(account.id), Cell::new(account.name)]);
    }
    println!("Accounts\n{table}");
    Ok(())
}

pub fn rename(old: &str, new: &str) -> Result<()> {
    let conn = open_ledger()?;
    ledger::rename_account(&conn, old, new)?;
    println!("Renamed account: {old} \u{2192} {}", new.trim());
    Ok(())
}

pub fn remove(name: &str) -> Result<()> {
    let conn = open_ledger()?;
    let removed = ledger::remove_account(&conn, name)?;
    println!("Removed account {name} ({removed} items)");
    Ok(())
}
