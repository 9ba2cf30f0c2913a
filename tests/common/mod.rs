//! Common test utilities for rowbind integration tests.
//!
//! Provides an in-memory [`SqlDriver`] whose result sets are scripted per
//! SQL text, so the whole pipeline — query handle, resolver, row loop,
//! destinations — runs end to end without a database.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use rowbind::{ConnectionError, Cursor, DecodeError, Parameter, SqlDriver, TransactionError, Value};

/// One scripted result set.
#[derive(Clone)]
pub struct MemResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// In-memory driver: result sets are keyed by exact SQL text.
pub struct MemDriver {
    results: HashMap<String, MemResult>,
    /// Statements passed to `execute`, for assertions.
    pub executed: Vec<(String, Vec<Parameter>)>,
    pub in_transaction: bool,
    pub committed: bool,
    pub rolled_back: bool,
    /// Set once the most recently handed-out cursor is released.
    pub last_cursor_released: Arc<AtomicBool>,
}

impl MemDriver {
    pub fn new() -> Self {
        Self {
            results: HashMap::new(),
            executed: Vec::new(),
            in_transaction: false,
            committed: false,
            rolled_back: false,
            last_cursor_released: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_result(mut self, sql: &str, columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        self.results.insert(
            sql.to_string(),
            MemResult {
                columns: columns.iter().map(|c| c.to_string()).collect(),
                rows,
            },
        );
        self
    }
}

pub struct MemCursor {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    next: usize,
    current: Option<Vec<Value>>,
    released: Arc<AtomicBool>,
}

#[async_trait]
impl Cursor for MemCursor {
    fn column_names(&self) -> Vec<String> {
        self.columns.clone()
    }

    async fn advance(&mut self) -> bool {
        if self.next < self.rows.len() {
            self.current = Some(self.rows[self.next].clone());
            self.next += 1;
            true
        } else {
            self.current = None;
            false
        }
    }

    fn decode_into(&mut self, row: &mut [Value]) -> Result<(), DecodeError> {
        let current = self.current.as_ref().expect("decode without a current row");
        row.clone_from_slice(current);
        Ok(())
    }

    fn last_error(&self) -> Option<ConnectionError> {
        None
    }

    async fn release(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl SqlDriver for MemDriver {
    async fn execute_query(
        &mut self,
        sql: &str,
        _params: &[Parameter],
    ) -> Result<Box<dyn Cursor>, ConnectionError> {
        let result = self
            .results
            .get(sql)
            .cloned()
            .ok_or_else(|| ConnectionError::ExecutionFailed(format!("no result for: {sql}")))?;

        let released = Arc::new(AtomicBool::new(false));
        self.last_cursor_released = Arc::clone(&released);

        Ok(Box::new(MemCursor {
            columns: result.columns,
            rows: result.rows,
            next: 0,
            current: None,
            released,
        }))
    }

    async fn execute(&mut self, sql: &str, params: &[Parameter]) -> Result<u64, ConnectionError> {
        self.executed.push((sql.to_string(), params.to_vec()));
        Ok(1)
    }

    async fn begin(&mut self) -> Result<(), TransactionError> {
        self.in_transaction = true;
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), TransactionError> {
        self.in_transaction = false;
        self.committed = true;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), TransactionError> {
        self.in_transaction = false;
        self.rolled_back = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        true
    }
}
