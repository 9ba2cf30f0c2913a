//! # rowbind
//!
//! Maps the ordered columns of a SQL result set onto one or more
//! caller-supplied destination structs, resolving automatically which column
//! feeds which (possibly nested) field, for both single-row and multi-row
//! capture.
//!
//! The engine is driver-agnostic: connections, transactions and per-column
//! scalar conversion live behind the [`SqlDriver`] and [`Cursor`] traits,
//! implemented by a database client library. rowbind contributes the part in
//! between — partitioning columns among destinations, recursing through
//! embedded sub-structures, and committing each row into the caller's
//! memory.
//!
//! ## Example
//!
//! ```no_run
//! use rowbind::{Client, Error};
//!
//! #[derive(Default)]
//! struct User {
//!     id: i64,
//!     name: String,
//! }
//!
//! rowbind::impl_record!(User {
//!     leaf id: i64,
//!     leaf name: String,
//! });
//!
//! # async fn example(client: Client) -> Result<(), Error> {
//! // Capture every row.
//! let mut users: Vec<User> = Vec::new();
//! client
//!     .select("SELECT id, name FROM users WHERE age > ?")
//!     .bind(18)
//!     .scan_vec(&mut users)
//!     .execute()
//!     .await?;
//!
//! // Capture exactly one row; zero rows is a distinguishable outcome.
//! let mut user = User::default();
//! match client
//!     .get("SELECT id, name FROM users WHERE id = ?")
//!     .bind(7)
//!     .scan(&mut user)
//!     .execute()
//!     .await
//! {
//!     Ok(()) => println!("found {}", user.name),
//!     Err(err) if err.is_not_found() => println!("no such user"),
//!     Err(err) => return Err(err),
//! }
//! # Ok(())
//! # }
//! ```

// Module declarations
pub mod client;
pub mod driver;
pub mod error;
pub mod query;
pub mod record;
pub mod resolve;

// Re-export public API
pub use client::{Client, Transaction};
pub use driver::{Cursor, Parameter, SqlDriver, Value};
pub use error::{ConnectionError, DecodeError, Error, SchemaError, TransactionError};
pub use query::Query;
pub use record::{FieldMeta, FieldPath, FromValue, Record};
pub use resolve::{resolve_positions, PositionList};
