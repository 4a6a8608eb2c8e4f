//! SQLite backend for the fuelbook ledger.
//!
//! Every vehicle gets its own database file inside a data directory. Access
//! goes through [`tokio_rusqlite`] so queries run on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
