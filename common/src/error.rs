use thiserror::Error;

use crate::storage::images::ImageError;

// Core internal errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[source] surrealdb::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Image error: {0}")]
    Image(#[from] ImageError),
    #[error("IoError: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

impl From<surrealdb::Error> for AppError {
    fn from(err: surrealdb::Error) -> Self {
        if is_unique_index_violation(&err) {
            return Self::Conflict(err.to_string());
        }
        Self::Database(err)
    }
}

// Embedded engines report a typed `IndexExists`; remote engines flatten the
// same failure into an API error message.
fn is_unique_index_violation(err: &surrealdb::Error) -> bool {
    if matches!(
        err,
        surrealdb::Error::Db(surrealdb::error::Db::IndexExists { .. })
    ) {
        return true;
    }
    err.to_string().contains("already contains")
}
