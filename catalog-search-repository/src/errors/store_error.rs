//! Relational store error types.

use thiserror::Error;

/// Errors that can occur during product store operations.
///
/// Connection-class failures are kept distinct from query failures:
/// callers treat a lost store connection as a run-level failure, while
/// a query failure inside one record's transaction only fails that
/// record.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to reach the database or acquire a connection.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// A query failed to execute.
    #[error("Query error: {0}")]
    QueryError(String),

    /// Failed to begin, commit, or roll back a transaction.
    #[error("Transaction error: {0}")]
    TransactionError(String),

    /// Schema bootstrap failed.
    #[error("Schema error: {0}")]
    SchemaError(String),

    /// A row expected to exist was not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl StoreError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create a transaction error.
    pub fn transaction(msg: impl Into<String>) -> Self {
        Self::TransactionError(msg.into())
    }

    /// Create a schema error.
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::SchemaError(msg.into())
    }

    /// Whether this error means the store itself is unreachable, as
    /// opposed to a single operation failing.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::ConnectionError(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(e) => Self::ConnectionError(e.to_string()),
            sqlx::Error::Tls(e) => Self::ConnectionError(e.to_string()),
            sqlx::Error::PoolTimedOut => Self::ConnectionError("connection pool timed out".to_string()),
            sqlx::Error::PoolClosed => Self::ConnectionError("connection pool closed".to_string()),
            sqlx::Error::RowNotFound => Self::NotFound("row not found".to_string()),
            other => Self::QueryError(other.to_string()),
        }
    }
}
