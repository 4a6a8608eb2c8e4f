//! Error types for `fuelbook-core`.

use thiserror::Error;

/// A rejected write. The offending input is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error("field {field} is not a valid {expected}: {value:?}")]
  Unparseable {
    field:    &'static str,
    expected: &'static str,
    value:    String,
  },

  #[error("field {field} is out of range: {value:?} ({reason})")]
  OutOfRange {
    field:  &'static str,
    value:  String,
    reason: &'static str,
  },

  #[error("unknown event type: {0:?}")]
  UnknownEventType(String),

  #[error("invalid vehicle name {name:?}: {reason}")]
  InvalidVehicleName { name: String, reason: &'static str },
}

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("vehicle not found: {0}")]
  VehicleNotFound(String),

  #[error("event not found: {0}")]
  EventNotFound(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
