use comfy_table::{Cell, CellAlignment, Table};

use crate::error::Result;
use crate::fmt::money;
use crate::ledger::{self, ItemUpdate};

use super::open_ledger;

pub fn add(account: &str, description: &str, price: f64, category: Option<&str>) -> Result<()> {
    let conn = open_ledger()?;
    let id = ledger::add_item(&conn, account, description, price, category)?;
    println!("Added item {id}: {} {}", description.trim(), money(price));
    Ok(())
}

pub fn list(account: Option<&str>) -> Result<()> {
    let conn = open_ledger()?;
    let items = ledger::list_items(&conn, account)?;
    if items.is_empty() {
        println!("No items to show yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Description", "Price", "Account", "Category"]);
    for item in items {
        table.add_row(vec![
            Cell::new(item.id),
            Cell::new(item.description),
            Cell::new(money(item.price)).set_alignment(CellAlignment::Right),
            Cell::new(item.account),
            Cell::new(item.category.unwrap_or_default()),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn edit(id: i64, update: &ItemUpdate<'_>) -> Result<()> {
    let conn = open_ledger()?;
    let item = ledger::update_item(&conn, id, update)?;
    println!(
        "Updated item {id}: {} {} [{}]",
        item.description,
        money(item.price),
        item.account
    );
    Ok(())
}

pub fn remove(id: i64) -> Result<()> {
    let conn = open_ledger()?;
    ledger::remove_item(&conn, id)?;
    println!("Removed item {id}");
    Ok(())
}
