//! Errors for query execution.

use thiserror::Error;

/// Something went wrong while running a plan against the database.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Query(#[from] QueryError),
    #[error("database error: {0}")]
    DB(#[from] sqlx::Error),
}

/// The plan and what came back from the database don't line up.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("variable '{0}' not found")]
    VariableNotFound(String),
    #[error("unexpected result shape: {0}")]
    MalformedResult(String),
}
