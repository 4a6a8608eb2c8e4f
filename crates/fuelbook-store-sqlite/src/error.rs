//! Error type for `fuelbook-store-sqlite`.

use fuelbook_core::{store::StoreError, vehicle::VehicleName};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// A stored row could not be decoded into an event.
  #[error("corrupt row {id}: {reason}")]
  Corrupt { id: i64, reason: String },

  #[error("vehicle not found: {0}")]
  VehicleNotFound(VehicleName),
}

impl StoreError for Error {
  fn is_not_found(&self) -> bool { matches!(self, Error::VehicleNotFound(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
