use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::error::Result;
use crate::fmt::money;
use crate::ledger;

use super::open_ledger;

pub fn run() -> Result<()> {
    let conn = open_ledger()?;
    let totals = ledger::account_totals(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["Account", "Items", "Total"]);
    let mut grand = 0.0;
    for row in &totals {
        grand += row.total;
        table.add_row(vec![
            Cell::new(&row.account),
            Cell::new(row.items).set_alignment(CellAlignment::Right),
            Cell::new(money(row.total)).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("Totals\n{table}");
    println!("{} {}", "Grand Total:".bold(), money(grand).bold());
    Ok(())
}
