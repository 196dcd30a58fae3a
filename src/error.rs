use thiserror::Error;

#[derive(Error, Debug)]
pub enum BudgetError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid unit '{0}': expected day, week, or month")]
    InvalidUnit(String),

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid amount '{0}'")]
    InvalidAmount(String),

    #[error("Repeat interval must be at least 1, got {0}")]
    NonPositiveInterval(i64),

    #[error("Not found: {0} {1}")]
    NotFound(&'static str, i64),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, BudgetError>;
