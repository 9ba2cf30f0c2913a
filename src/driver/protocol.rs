//! Driver protocol traits.
//!
//! These traits are the seam between the binding engine and a concrete
//! database client. The engine calls them; it never implements them.

use async_trait::async_trait;

use crate::driver::{Parameter, Value};
use crate::error::{ConnectionError, DecodeError, TransactionError};

/// Live handle over an in-progress result set.
///
/// A cursor has exactly one owner for its lifetime: the `execute()` call that
/// acquired it. It supports forward-only row advancement and positional
/// decode of the current row.
#[async_trait]
pub trait Cursor: Send {
    /// Ordered column names of the result set. Duplicates are permitted and
    /// order is significant.
    fn column_names(&self) -> Vec<String>;

    /// Advance to the next row. Returns `false` when the result set is
    /// exhausted or a cursor error occurred; the distinction is reported
    /// afterwards by [`Cursor::last_error`].
    async fn advance(&mut self) -> bool;

    /// Decode the current row positionally into `row`, one slot per column.
    ///
    /// All scalar conversion happens here, inside the driver. The buffer
    /// length always equals the column count.
    fn decode_into(&mut self, row: &mut [Value]) -> Result<(), DecodeError>;

    /// Error that terminated iteration early, if any.
    fn last_error(&self) -> Option<ConnectionError>;

    /// Release the cursor and any server-side resources.
    ///
    /// Idempotent and always safe to call, including with rows still
    /// unconsumed.
    async fn release(&mut self);
}

/// Database client operations consumed by the engine.
///
/// Cancellation and timeouts beyond the per-query timeout are the
/// implementation's concern; the engine observes failures as returned errors.
#[async_trait]
pub trait SqlDriver: Send + Sync {
    /// Execute a query and return a live cursor over its result set.
    async fn execute_query(
        &mut self,
        sql: &str,
        params: &[Parameter],
    ) -> Result<Box<dyn Cursor>, ConnectionError>;

    /// Execute a statement that returns no rows, yielding the affected count.
    async fn execute(&mut self, sql: &str, params: &[Parameter]) -> Result<u64, ConnectionError>;

    /// Begin a transaction on this connection.
    async fn begin(&mut self) -> Result<(), TransactionError>;

    /// Commit the active transaction.
    async fn commit(&mut self) -> Result<(), TransactionError>;

    /// Roll back the active transaction.
    async fn rollback(&mut self) -> Result<(), TransactionError>;

    /// Check if the connection is still active.
    fn is_connected(&self) -> bool;
}
