//! Error types for rowbind.
//!
//! This module defines domain-specific error types organized by functional area.

use thiserror::Error;

/// Top-level error type encompassing all possible errors.
#[derive(Error, Debug)]
pub enum Error {
    /// Column/field resolution errors
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Per-column decode errors surfaced from the driver boundary
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Connection and cursor errors
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Transaction control errors
    #[error(transparent)]
    Transaction(#[from] TransactionError),

    /// A first-row query produced zero rows
    #[error("query returned no rows")]
    NotFound,
}

impl Error {
    /// Check whether this is the "no rows" outcome of a first-row query.
    ///
    /// Callers are expected to treat this as a normal, non-exceptional result.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound)
    }
}

/// Errors raised while partitioning result-set columns among destinations.
///
/// All variants are fatal to the current call and are never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Columns remained after every destination consumed its share
    #[error("{count} trailing columns not consumed by any destination")]
    UnassignedColumns { count: usize },

    /// A destination's field count extends past the end of the column list
    #[error("result set is {missing} columns short of the destinations' field count")]
    NotEnoughColumns { missing: usize },

    /// Columns inside a leaf block matched no registered field name
    #[error("{count} columns matched no destination field")]
    UnmatchedColumns { count: usize },
}

/// Errors raised while writing a decoded value into a destination field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Value shape does not fit the field's type
    #[error("cannot decode {found} value into {expected}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Numeric value does not fit the field's width
    #[error("value {value} out of range for {target}")]
    OutOfRange { value: String, target: &'static str },

    /// A field path descended past the struct's field count
    #[error("no field at index {index}")]
    NoField { index: usize },

    /// A field path terminated before reaching a leaf field
    #[error("field path is empty")]
    EmptyFieldPath,

    /// Raw column-to-scalar conversion failure reported by the driver
    #[error("column {index}: {message}")]
    Column { index: usize, message: String },
}

/// Opaque failures from the connection/driver boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// Query execution failed before a cursor could be produced
    #[error("failed to execute query: {0}")]
    ExecutionFailed(String),

    /// Cursor reported an error while iterating
    #[error("cursor error: {0}")]
    Cursor(String),

    /// Query timeout
    #[error("query timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Connection is closed
    #[error("connection is closed")]
    Closed,
}

/// Opaque failures from transaction control at the driver boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    /// Failed to begin a transaction
    #[error("failed to begin transaction: {0}")]
    BeginFailed(String),

    /// Failed to commit
    #[error("failed to commit transaction: {0}")]
    CommitFailed(String),

    /// Failed to roll back
    #[error("failed to roll back transaction: {0}")]
    RollbackFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_display() {
        let err = SchemaError::UnassignedColumns { count: 3 };
        assert!(err.to_string().contains("3 trailing columns"));

        let err = SchemaError::UnmatchedColumns { count: 2 };
        assert!(err.to_string().contains("2 columns matched no"));
    }

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::TypeMismatch {
            expected: "i64",
            found: "string",
        };
        assert!(err.to_string().contains("string"));
        assert!(err.to_string().contains("i64"));

        let err = DecodeError::Column {
            index: 4,
            message: "bad date literal".to_string(),
        };
        assert!(err.to_string().contains("column 4"));
    }

    #[test]
    fn test_connection_error_display() {
        let err = ConnectionError::Timeout { timeout_ms: 5000 };
        assert!(err.to_string().contains("5000ms"));
    }

    #[test]
    fn test_not_found_detection() {
        assert!(Error::NotFound.is_not_found());

        let err = Error::from(SchemaError::UnassignedColumns { count: 1 });
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_transparent_wrapping() {
        let inner = TransactionError::CommitFailed("socket closed".to_string());
        let outer = Error::from(inner.clone());
        assert_eq!(outer.to_string(), inner.to_string());
    }
}
