use std::path::{Path, PathBuf};

use colored::Colorize;
use rusqlite::Connection;

use crate::archive::{archive_file, compute_checksum};
use crate::error::{BillbookError, Result};
use crate::extract::{can_extract, BillExtractor, ExtractOutcome, ExtractorConfig};
use crate::fmt::money;
use crate::ledger;
use crate::models::Bill;
use crate::settings::load_settings;

use super::open_ledger;

/// Explicit categories win; otherwise use the ledger's vocabulary when a
/// database exists.
fn resolve_categories(explicit: Vec<String>, conn: Option<&Connection>) -> Result<Vec<String>> {
    if !explicit.is_empty() {
        return Ok(explicit);
    }
    match conn {
        Some(conn) => ledger::category_names(conn),
        None => Ok(Vec::new()),
    }
}

fn run_extraction(file: &Path, categories: &[String]) -> Result<ExtractOutcome> {
    let config = ExtractorConfig::from_settings(&load_settings());
    let extractor = BillExtractor::from_config(config)
        .map_err(|e| BillbookError::Other(e.user_message()))?;
    Ok(extractor.extract(file, categories))
}

pub fn extract(file: &str, categories: Vec<String>) -> Result<()> {
    let conn = open_ledger()
        .inspect_err(|e| tracing::warn!("ledger unavailable, extracting without categories: {e}"))
        .ok();
    let categories = resolve_categories(categories, conn.as_ref())?;

    let (success, payload) = run_extraction(Path::new(file), &categories)?.into_pair();
    if !success {
        return Err(BillbookError::Other(payload));
    }
    println!("{payload}");
    Ok(())
}

pub fn import(file: &str, account: Option<&str>, categories: Vec<String>, force: bool) -> Result<()> {
    let source = PathBuf::from(file);
    if !source.is_file() {
        return Err(BillbookError::Other(format!("File not found: {file}")));
    }
    if !can_extract(&source) {
        return Err(BillbookError::Other(format!(
            "Unsupported file type: {}",
            source.display()
        )));
    }

    let conn = open_ledger()?;
    if let Some(name) = account {
        if !ledger::list_accounts(&conn)?.iter().any(|a| a.name == name) {
            return Err(BillbookError::UnknownAccount(name.to_string()));
        }
    }

    let checksum = compute_checksum(&source)?;
    if !force && already_imported(&conn, &checksum)? {
        println!("This file has already been imported (duplicate checksum). Use --force to import again.");
        return Ok(());
    }

    let categories = resolve_categories(categories, Some(&conn))?;
    let bill = match run_extraction(&source, &categories)? {
        ExtractOutcome::Extracted(bill) => bill,
        ExtractOutcome::Failed(message) => return Err(BillbookError::Other(message)),
    };
    println!("{}", ExtractOutcome::Extracted(bill.clone()).payload());

    let settings = load_settings();
    let today = chrono::Local::now().date_naive();
    let stored = archive_file(&settings.data_path().join("bills"), &source, today)?;
    println!("Archived to {}", stored.display());

    let recorded = record_import(&conn, account, &bill, &stored, &checksum).inspect_err(|_| {
        if let Err(e) = std::fs::remove_file(&stored) {
            tracing::warn!(path = %stored.display(), "could not remove archived copy: {e}");
        }
    })?;

    println!(
        "{} line items, total {}",
        bill.items.len(),
        money(bill.total())
    );
    match account {
        Some(name) => println!("{}", format!("{recorded} items recorded in {name}").green()),
        None => println!("Items not recorded (pass --account to add them to the ledger)."),
    }
    Ok(())
}

/// Record the bill's items and its import row together, or neither.
fn record_import(
    conn: &Connection,
    account: Option<&str>,
    bill: &Bill,
    stored: &Path,
    checksum: &str,
) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let recorded = match account {
        Some(name) => record_items(&tx, name, bill)?,
        None => 0,
    };
    tx.execute(
        "INSERT INTO imports (filename, stored_path, checksum, bill_number, item_count) VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            bill.source_filename,
            stored.to_string_lossy().to_string(),
            checksum,
            bill.bill_number,
            bill.items.len() as i64,
        ],
    )?;
    tx.commit()?;
    Ok(recorded)
}

fn already_imported(conn: &Connection, checksum: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT 1 FROM imports WHERE checksum = ?1")?;
    Ok(stmt.exists([checksum])?)
}

fn record_items(conn: &Connection, account: &str, bill: &Bill) -> Result<usize> {
    let mut recorded = 0;
    for item in &bill.items {
        ledger::add_item(conn, account, &item.description, item.price, item.category.as_deref())?;
        recorded += 1;
    }
    Ok(recorded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_db;
    use crate::models::LineItem;

    fn sample_bill() -> Bill {
        Bill {
            bill_number: Some("42".to_string()),
            items: vec![
                LineItem {
                    description: "Milk".to_string(),
                    quantity: Some(2.0),
                    unit_price: Some(1.25),
                    price: 2.5,
                    category: Some("groceries".to_string()),
                },
                LineItem {
                    description: "Bread".to_string(),
                    quantity: None,
                    unit_price: None,
                    price: 3.0,
                    category: None,
                },
            ],
            source_filename: "receipt.pdf".to_string(),
        }
    }

    #[test]
    fn test_record_import_writes_items_and_checksum() {
        let (_dir, conn) = test_db();
        ledger::add_account(&conn, "Household").unwrap();
        let recorded =
            record_import(&conn, Some("Household"), &sample_bill(), Path::new("/tmp/r.pdf"), "abc").unwrap();
        assert_eq!(recorded, 2);
        assert_eq!(ledger::list_items(&conn, Some("Household")).unwrap().len(), 2);
        assert!(already_imported(&conn, "abc").unwrap());
    }

    #[test]
    fn test_record_import_is_all_or_nothing() {
        let (_dir, conn) = test_db();
        ledger::add_account(&conn, "Household").unwrap();
        conn.execute_batch("DROP TABLE imports").unwrap();

        assert!(record_import(&conn, Some("Household"), &sample_bill(), Path::new("/tmp/r.pdf"), "abc").is_err());
        assert!(ledger::list_items(&conn, Some("Household")).unwrap().is_empty());
    }
}
