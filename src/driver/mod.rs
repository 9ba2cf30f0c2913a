//! Driver boundary abstractions.
//!
//! rowbind does not speak any wire protocol itself. This module defines the
//! traits a database client library implements so the binding engine can
//! execute queries and iterate result sets through it.

pub mod params;
pub mod protocol;

pub use params::Parameter;
pub use protocol::{Cursor, SqlDriver};

/// Decoded scalar produced by the driver for one result-set cell.
///
/// Drivers own all column-to-scalar conversion (dates, numbers, strings);
/// the engine only routes these values into destination fields.
pub use serde_json::Value;
