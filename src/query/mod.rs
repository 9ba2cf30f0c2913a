//! Query building and execution.
//!
//! [`Query`] is the single entry point of the binding engine: it carries the
//! SQL text, parameters and destinations, and `execute` drives the cursor,
//! the resolver and the row loop to completion.

pub mod handle;
pub(crate) mod iterator;

pub use handle::Query;
