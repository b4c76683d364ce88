//! SQLite backend for the case-based diagnostic store.
//!
//! Persists case-base payloads as named slots in a single SQLite file. The
//! store treats payloads as opaque text; decoding belongs to `cbr-core`.

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
