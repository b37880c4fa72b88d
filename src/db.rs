use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS accounts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT UNIQUE NOT NULL
);

CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    account TEXT NOT NULL,
    description TEXT NOT NULL,
    price REAL NOT NULL,
    category TEXT,
    created_at TEXT DEFAULT (datetime('now')),
    FOREIGN KEY (account) REFERENCES accounts (name) ON UPDATE CASCADE ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT UNIQUE NOT NULL
);

CREATE TABLE IF NOT EXISTS imports (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    filename TEXT NOT NULL,
    stored_path TEXT NOT NULL,
    checksum TEXT NOT NULL,
    bill_number TEXT,
    item_count INTEGER,
    import_date TEXT DEFAULT (datetime('now'))
);
";

const DEFAULT_CATEGORIES: &[&str] = &[
    "groceries",
    "dining",
    "utilities",
    "household",
    "transport",
    "health",
    "entertainment",
    "other",
];

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

/// Schema version stored in `PRAGMA user_version` once defaults are seeded.
const SEEDED_VERSION: i64 = 1;

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;

    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version < SEEDED_VERSION {
        let tx = conn.unchecked_transaction()?;
        for name in DEFAULT_CATEGORIES {
            tx.execute("INSERT OR IGNORE INTO categories (name) VALUES (?1)", [name])?;
        }
        tx.execute_batch(&format!("PRAGMA user_version = {SEEDED_VERSION}"))?;
        tx.commit()?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn test_db() -> (tempfile::TempDir, Connection) {
    let dir = tempfile::tempdir().unwrap();
    let conn = get_connection(&dir.path().join("test.db")).unwrap();
    init_db(&conn).unwrap();
    (dir, conn)
}
