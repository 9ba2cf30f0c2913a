//! Deferred query execution.
//!
//! A [`Query`] collects SQL text, positional parameters and destination
//! borrows, then runs everything in one `execute` call: acquire a cursor,
//! resolve columns, iterate rows, and release the cursor on every exit path.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::debug;

use crate::driver::{Cursor, Parameter, SqlDriver};
use crate::error::{ConnectionError, Error};
use crate::query::iterator::drive_cursor;
use crate::record::destination::{BoxedVecDest, Destination, SingleDest, VecDest};
use crate::record::Record;

const DEFAULT_TIMEOUT_MS: u64 = 120_000;

/// Hook invoked once after iteration, with the cursor still open, for
/// side-channel inspection of driver state. Receives `None` for the cursor
/// when execution failed before one was acquired.
type PostAction<'a> = Box<dyn FnOnce(Option<&dyn Cursor>, Option<&Error>) + Send + 'a>;

/// A deferred query bound to a connection or an active transaction.
///
/// Built via [`Client::select`](crate::Client::select) /
/// [`Client::get`](crate::Client::get) (or their [`Transaction`](crate::Transaction)
/// counterparts), populated builder-style, and consumed by
/// [`execute`](Query::execute).
pub struct Query<'a> {
    driver: Arc<Mutex<dyn SqlDriver>>,
    sql: String,
    params: Vec<Parameter>,
    destinations: Vec<Box<dyn Destination + 'a>>,
    first_row_only: bool,
    timeout_ms: u64,
    post_action: Option<PostAction<'a>>,
}

impl<'a> Query<'a> {
    pub(crate) fn new(
        driver: Arc<Mutex<dyn SqlDriver>>,
        sql: String,
        first_row_only: bool,
    ) -> Self {
        Self {
            driver,
            sql,
            params: Vec::new(),
            destinations: Vec::new(),
            first_row_only,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            post_action: None,
        }
    }

    /// Get the SQL text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Append one positional parameter.
    pub fn bind<T: Into<Parameter>>(mut self, value: T) -> Self {
        self.params.push(value.into());
        self
    }

    /// Register a single-struct destination, overwritten on every committed
    /// row. Paired with a multi-row query this keeps the last row's values.
    pub fn scan<T: Record>(mut self, dest: &'a mut T) -> Self {
        self.destinations.push(Box::new(SingleDest(dest)));
        self
    }

    /// Register a growing-sequence destination, appended in row order.
    pub fn scan_vec<T: Record>(mut self, dest: &'a mut Vec<T>) -> Self {
        self.destinations.push(Box::new(VecDest(dest)));
        self
    }

    /// Register a growing sequence of boxed structs, appended in row order.
    pub fn scan_boxed<T: Record>(mut self, dest: &'a mut Vec<Box<T>>) -> Self {
        self.destinations.push(Box::new(BoxedVecDest(dest)));
        self
    }

    /// Set the cursor-acquisition timeout.
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Register a hook that runs once after iteration, before the cursor is
    /// released, with the outcome of the call.
    pub fn post_action(
        mut self,
        hook: impl FnOnce(Option<&dyn Cursor>, Option<&Error>) + Send + 'a,
    ) -> Self {
        self.post_action = Some(Box::new(hook));
        self
    }

    /// Execute the query and run the selected iteration policy to
    /// completion.
    ///
    /// The cursor is released before this returns, on success and on every
    /// error path alike.
    ///
    /// # Errors
    ///
    /// `Error::Schema` when columns and destination fields cannot be
    /// reconciled, `Error::NotFound` when a first-row query yields no rows,
    /// `Error::Decode` on a driver conversion failure, and
    /// `Error::Connection` for driver/cursor failures, including timeout.
    pub async fn execute(mut self) -> Result<(), Error> {
        debug!(sql = %self.sql, destinations = self.destinations.len(), "executing query");

        let driver = Arc::clone(&self.driver);
        let acquire = async {
            driver
                .lock()
                .await
                .execute_query(&self.sql, &self.params)
                .await
        };
        let acquired = match timeout(Duration::from_millis(self.timeout_ms), acquire).await {
            Ok(result) => result,
            Err(_) => Err(ConnectionError::Timeout {
                timeout_ms: self.timeout_ms,
            }),
        };

        let mut cursor = match acquired {
            Ok(cursor) => cursor,
            Err(err) => {
                let err = Error::Connection(err);
                if let Some(hook) = self.post_action.take() {
                    hook(None, Some(&err));
                }
                return Err(err);
            }
        };

        let outcome = drive_cursor(
            cursor.as_mut(),
            &mut self.destinations,
            self.first_row_only,
        )
        .await;

        if let Some(hook) = self.post_action.take() {
            hook(Some(&*cursor), outcome.as_ref().err());
        }

        cursor.release().await;
        outcome
    }
}
