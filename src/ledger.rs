use rusqlite::{Connection, OptionalExtension};

use crate::error::{BillbookError, Result};
use crate::models::{Account, Category, Item};

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

fn account_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare_cached("SELECT 1 FROM accounts WHERE name = ?1")?;
    Ok(stmt.exists([name])?)
}

pub fn add_account(conn: &Connection, name: &str) -> Result<Account> {
    let name = name.trim();
    if name.is_empty() {
        return Err(BillbookError::Other("Account name cannot be empty".to_string()));
    }
    if account_exists(conn, name)? {
        return Err(BillbookError::DuplicateAccount(name.to_string()));
    }
    conn.execute("INSERT INTO accounts (name) VALUES (?1)", [name])?;
    Ok(Account {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
    })
}

pub fn list_accounts(conn: &Connection) -> Result<Vec<Account>> {
    let mut stmt = conn.prepare("SELECT id, name FROM accounts ORDER BY name")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Account {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Rename an account; its items follow through the foreign key cascade.
pub fn rename_account(conn: &Connection, old: &str, new: &str) -> Result<()> {
    let new = new.trim();
    if new.is_empty() {
        return Err(BillbookError::Other("Account name cannot be empty".to_string()));
    }
    if !account_exists(conn, old)? {
        return Err(BillbookError::UnknownAccount(old.to_string()));
    }
    if new == old {
        return Ok(());
    }
    if account_exists(conn, new)? {
        return Err(BillbookError::DuplicateAccount(new.to_string()));
    }
    conn.execute("UPDATE accounts SET name = ?1 WHERE name = ?2", [new, old])?;
    Ok(())
}

/// Remove an account and every item recorded against it. Returns the number
/// of items removed.
pub fn remove_account(conn: &Connection, name: &str) -> Result<usize> {
    if !account_exists(conn, name)? {
        return Err(BillbookError::UnknownAccount(name.to_string()));
    }
    let items: i64 = conn.query_row(
        "SELECT count(*) FROM items WHERE account = ?1",
        [name],
        |r| r.get(0),
    )?;
    conn.execute("DELETE FROM accounts WHERE name = ?1", [name])?;
    Ok(items as usize)
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

pub fn add_item(
    conn: &Connection,
    account: &str,
    description: &str,
    price: f64,
    category: Option<&str>,
) -> Result<i64> {
    if !account_exists(conn, account)? {
        return Err(BillbookError::UnknownAccount(account.to_string()));
    }
    let description = description.trim();
    if description.is_empty() {
        return Err(BillbookError::EmptyDescription);
    }
    conn.execute(
        "INSERT INTO items (account, description, price, category) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![account, description, price, category],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_item(conn: &Connection, id: i64) -> Result<Item> {
    conn.query_row(
        "SELECT id, account, description, price, category FROM items WHERE id = ?1",
        [id],
        item_from_row,
    )
    .optional()?
    .ok_or(BillbookError::UnknownItem(id))
}

pub fn list_items(conn: &Connection, account: Option<&str>) -> Result<Vec<Item>> {
    let mut stmt = conn.prepare(
        "SELECT id, account, description, price, category FROM items \
         WHERE ?1 IS NULL OR account = ?1 ORDER BY id",
    )?;
    let rows = stmt
        .query_map([account], item_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub struct ItemUpdate<'a> {
    pub description: Option<&'a str>,
    pub price: Option<f64>,
    pub account: Option<&'a str>,
    pub category: Option<&'a str>,
}

pub fn update_item(conn: &Connection, id: i64, update: &ItemUpdate<'_>) -> Result<Item> {
    let mut item = get_item(conn, id)?;
    if let Some(desc) = update.description {
        let desc = desc.trim();
        if desc.is_empty() {
            return Err(BillbookError::EmptyDescription);
        }
        item.description = desc.to_string();
    }
    if let Some(price) = update.price {
        item.price = price;
    }
    if let Some(account) = update.account {
        if !account_exists(conn, account)? {
            return Err(BillbookError::UnknownAccount(account.to_string()));
        }
        item.account = account.to_string();
    }
    if let Some(category) = update.category {
        item.category = Some(category.to_string());
    }
    conn.execute(
        "UPDATE items SET description = ?1, price = ?2, account = ?3, category = ?4 WHERE id = ?5",
        rusqlite::params![item.description, item.price, item.account, item.category, id],
    )?;
    Ok(item)
}

pub fn remove_item(conn: &Connection, id: i64) -> Result<()> {
    let removed = conn.execute("DELETE FROM items WHERE id = ?1", [id])?;
    if removed == 0 {
        return Err(BillbookError::UnknownItem(id));
    }
    Ok(())
}

fn item_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(0)?,
        account: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        category: row.get(4)?,
    })
}

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

pub struct AccountTotal {
    pub account: String,
    pub items: i64,
    pub total: f64,
}

/// Per-account sums, including accounts with no items.
pub fn account_totals(conn: &Connection) -> Result<Vec<AccountTotal>> {
    let mut stmt = conn.prepare(
        "SELECT a.name, count(i.id), COALESCE(SUM(i.price), 0.0) \
         FROM accounts a LEFT JOIN items i ON i.account = a.name \
         GROUP BY a.name ORDER BY a.name",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(AccountTotal {
                account: row.get(0)?,
                items: row.get(1)?,
                total: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

pub fn list_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare("SELECT id, name FROM categories ORDER BY id")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn category_names(conn: &Connection) -> Result<Vec<String>> {
    Ok(list_categories(conn)?.into_iter().map(|c| c.name).collect())
}

pub fn add_category(conn: &Connection, name: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(BillbookError::Other("Category name cannot be empty".to_string()));
    }
    conn.execute("INSERT OR IGNORE INTO categories (name) VALUES (?1)", [name])?;
    Ok(())
}

pub fn remove_category(conn: &Connection, name: &str) -> Result<()> {
    let removed = conn.execute("DELETE FROM categories WHERE name = ?1", [name])?;
    if removed == 0 {
        return Err(BillbookError::UnknownCategory(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_db;

    #[test]
    fn test_add_and_list_accounts_sorted() {
        let (_dir, conn) = test_db();
        add_account(&conn, "Utilities").unwrap();
        add_account(&conn, "  Groceries ").unwrap();
        let names: Vec<String> = list_accounts(&conn).unwrap().into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["Groceries", "Utilities"]);
    }

    #[test]
    fn test_duplicate_account_rejected() {
        let (_dir, conn) = test_db();
        add_account(&conn, "Home").unwrap();
        let err = add_account(&conn, "Home").unwrap_err();
        assert!(matches!(err, BillbookError::DuplicateAccount(_)));
    }

    #[test]
    fn test_empty_account_name_rejected() {
        let (_dir, conn) = test_db();
        assert!(add_account(&conn, "   ").is_err());
    }

    #[test]
    fn test_rename_cascades_to_items() {
        let (_dir, conn) = test_db();
        add_account(&conn, "Home").unwrap();
        let id = add_item(&conn, "Home", "Light bulbs", 12.5, None).unwrap();
        rename_account(&conn, "Home", "House").unwrap();
        assert_eq!(get_item(&conn, id).unwrap().account, "House");
        assert!(list_items(&conn, Some("Home")).unwrap().is_empty());
    }

    #[test]
    fn test_rename_to_existing_rejected() {
        let (_dir, conn) = test_db();
        add_account(&conn, "A").unwrap();
        add_account(&conn, "B").unwrap();
        let err = rename_account(&conn, "A", "B").unwrap_err();
        assert!(matches!(err, BillbookError::DuplicateAccount(_)));
    }

    #[test]
    fn test_remove_account_removes_items() {
        let (_dir, conn) = test_db();
        add_account(&conn, "Home").unwrap();
        add_account(&conn, "Car").unwrap();
        add_item(&conn, "Home", "Rent", 900.0, None).unwrap();
        add_item(&conn, "Home", "Water", 30.0, Some("utilities")).unwrap();
        add_item(&conn, "Car", "Fuel", 45.0, Some("transport")).unwrap();
        assert_eq!(remove_account(&conn, "Home").unwrap(), 2);
        let items = list_items(&conn, None).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].account, "Car");
    }

    #[test]
    fn test_add_item_requires_account_and_description() {
        let (_dir, conn) = test_db();
        assert!(matches!(
            add_item(&conn, "Nope", "Thing", 1.0, None).unwrap_err(),
            BillbookError::UnknownAccount(_)
        ));
        add_account(&conn, "Home").unwrap();
        assert!(matches!(
            add_item(&conn, "Home", "  ", 1.0, None).unwrap_err(),
            BillbookError::EmptyDescription
        ));
    }

    #[test]
    fn test_update_item_fields() {
        let (_dir, conn) = test_db();
        add_account(&conn, "Home").unwrap();
        add_account(&conn, "Office").unwrap();
        let id = add_item(&conn, "Home", "Paper", 5.0, None).unwrap();
        let updated = update_item(
            &conn,
            id,
            &ItemUpdate {
                description: Some("Printer paper"),
                price: Some(7.25),
                account: Some("Office"),
                category: Some("household"),
            },
        )
        .unwrap();
        assert_eq!(updated, get_item(&conn, id).unwrap());
        assert_eq!(updated.description, "Printer paper");
        assert_eq!(updated.price, 7.25);
        assert_eq!(updated.account, "Office");
        assert_eq!(updated.category.as_deref(), Some("household"));
    }

    #[test]
    fn test_remove_missing_item() {
        let (_dir, conn) = test_db();
        assert!(matches!(remove_item(&conn, 42).unwrap_err(), BillbookError::UnknownItem(42)));
    }

    #[test]
    fn test_account_totals_include_empty_accounts() {
        let (_dir, conn) = test_db();
        add_account(&conn, "Home").unwrap();
        add_account(&conn, "Empty").unwrap();
        add_item(&conn, "Home", "Rent", 900.0, None).unwrap();
        add_item(&conn, "Home", "Water", 30.5, None).unwrap();
        let totals = account_totals(&conn).unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].account, "Empty");
        assert_eq!(totals[0].total, 0.0);
        assert_eq!(totals[1].items, 2);
        assert_eq!(totals[1].total, 930.5);
    }

    #[test]
    fn test_categories_seeded_and_editable() {
        let (_dir, conn) = test_db();
        let names = category_names(&conn).unwrap();
        assert_eq!(names.first().map(String::as_str), Some("groceries"));
        add_category(&conn, "pets").unwrap();
        add_category(&conn, "pets").unwrap();
        assert_eq!(category_names(&conn).unwrap().iter().filter(|n| *n == "pets").count(), 1);
        remove_category(&conn, "pets").unwrap();
        assert!(remove_category(&conn, "pets").is_err());
    }
}
