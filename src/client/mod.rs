//! Client-facing connection and transaction handles.
//!
//! [`Client`] wraps a shared driver and hands out deferred queries;
//! [`Transaction`] does the same for statements that should run inside an
//! active transaction. Both are thin pass-throughs: all resolution and
//! binding work happens in the query layer.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::driver::{Parameter, SqlDriver};
use crate::error::{ConnectionError, TransactionError};
use crate::query::Query;

/// Handle over a database connection.
///
/// Cheap to clone; concurrent `execute` calls are safe because every query
/// allocates its own position lists and instances, and each cursor is owned
/// by exactly one call.
#[derive(Clone)]
pub struct Client {
    driver: Arc<Mutex<dyn SqlDriver>>,
}

impl Client {
    /// Wrap an already-shared driver.
    pub fn new(driver: Arc<Mutex<dyn SqlDriver>>) -> Self {
        Self { driver }
    }

    /// Wrap a driver instance.
    pub fn from_driver(driver: impl SqlDriver + 'static) -> Self {
        Self::new(Arc::new(Mutex::new(driver)))
    }

    /// Build a multi-row query: every result row is committed.
    pub fn select<'a>(&self, sql: impl Into<String>) -> Query<'a> {
        Query::new(Arc::clone(&self.driver), sql.into(), false)
    }

    /// Build a single-row query: only the first row is committed, and zero
    /// rows fail with [`Error::NotFound`](crate::Error::NotFound).
    pub fn get<'a>(&self, sql: impl Into<String>) -> Query<'a> {
        Query::new(Arc::clone(&self.driver), sql.into(), true)
    }

    /// Execute a statement that returns no rows, yielding the affected
    /// count. Pure pass-through to the driver.
    pub async fn execute(
        &self,
        sql: &str,
        params: &[Parameter],
    ) -> Result<u64, ConnectionError> {
        self.driver.lock().await.execute(sql, params).await
    }

    /// Begin a transaction.
    pub async fn begin(&self) -> Result<Transaction, TransactionError> {
        self.driver.lock().await.begin().await?;
        Ok(Transaction {
            driver: Arc::clone(&self.driver),
        })
    }

    /// Check if the underlying connection is still active.
    pub async fn is_connected(&self) -> bool {
        self.driver.lock().await.is_connected()
    }
}

/// Handle over an active transaction.
///
/// Queries built here run inside the transaction; the driver is responsible
/// for routing them accordingly. Consume the handle with
/// [`commit`](Transaction::commit) or [`rollback`](Transaction::rollback).
pub struct Transaction {
    driver: Arc<Mutex<dyn SqlDriver>>,
}

impl std::fmt::Debug for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction").finish_non_exhaustive()
    }
}

impl Transaction {
    /// Build a multi-row query inside this transaction.
    pub fn select<'a>(&self, sql: impl Into<String>) -> Query<'a> {
        Query::new(Arc::clone(&self.driver), sql.into(), false)
    }

    /// Build a single-row query inside this transaction.
    pub fn get<'a>(&self, sql: impl Into<String>) -> Query<'a> {
        Query::new(Arc::clone(&self.driver), sql.into(), true)
    }

    /// Execute a statement that returns no rows inside this transaction.
    pub async fn execute(
        &self,
        sql: &str,
        params: &[Parameter],
    ) -> Result<u64, ConnectionError> {
        self.driver.lock().await.execute(sql, params).await
    }

    /// Commit the transaction.
    pub async fn commit(self) -> Result<(), TransactionError> {
        self.driver.lock().await.commit().await
    }

    /// Roll back the transaction.
    pub async fn rollback(self) -> Result<(), TransactionError> {
        self.driver.lock().await.rollback().await
    }
}
