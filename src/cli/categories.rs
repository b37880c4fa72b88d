use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::ledger;

use super::open_ledger;

pub fn add(name: &str) -> Result<()> {
    let conn = open_ledger()?;
    ledger::add_category(&conn, name)?;
    println!("Added category: {}", name.trim());
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = open_ledger()?;
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name"]);
    for category in ledger::list_categories(&conn)? {
        table.add_row(vec![Cell::new(category.id), Cell::new(category.name)]);
    }
    println!("Categories\n{table}");
    Ok(())
}

pub fn remove(name: &str) -> Result<()> {
    let conn = open_ledger()?;
    ledger::remove_category(&conn, name)?;
    println!("Removed category: {name}");
    Ok(())
}
