use chrono::NaiveDate;
use comfy_table::{Cell, CellAlignment, Table};

use crate::archive::files_for_date;
use crate::error::{BillbookError, Result};
use crate::fmt::format_bytes;
use crate::settings::get_data_dir;

pub fn run(date: Option<&str>) -> Result<()> {
    let date = match date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| BillbookError::Other(format!("Invalid date '{raw}', expected YYYY-MM-DD")))?,
        None => chrono::Local::now().date_naive(),
    };

    let files = files_for_date(&get_data_dir().join("bills"), date)?;
    if files.is_empty() {
        println!("No bills archived on {date}.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Name", "Size", "Modified", "Path"]);
    for file in files {
        table.add_row(vec![
            Cell::new(file.name),
            Cell::new(format_bytes(file.size)).set_alignment(CellAlignment::Right),
            Cell::new(file.modified.format("%H:%M:%S")),
            Cell::new(file.path.display()),
        ]);
    }
    println!("Bills archived on {date}\n{table}");
    Ok(())
}
