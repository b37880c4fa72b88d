use thiserror::Error;

#[derive(Error, Debug)]
pub enum BillbookError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    #[error("Account already exists: {0}")]
    DuplicateAccount(String),

    #[error("No item with ID {0}")]
    UnknownItem(i64),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Description cannot be empty")]
    EmptyDescription,

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, BillbookError>;
