use thiserror::Error;

/// Failure reported by a [`SQLStore`](crate::SQLStore).
///
/// `Constraint` is split out so callers can answer a duplicate key as a
/// conflict instead of a broken store.
#[derive(Error, Debug)]
pub enum SQLError {
    /// Statement could not be prepared or rows could not be read.
    #[error("query error: {0}")]
    Query(String),

    /// Statement ran and failed.
    #[error("execution error: {0}")]
    Execution(String),

    /// A UNIQUE, PRIMARY KEY or NOT NULL constraint rejected the write.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// Database could not be opened or configured.
    #[error("connection error: {0}")]
    Connection(String),
}

impl SQLError {
    pub fn is_constraint(&self) -> bool {
        matches!(self, SQLError::Constraint(_))
    }
}
