//! Error type for the HTML routes and its `IntoResponse` implementation.

use axum::{
  http::StatusCode,
  response::{Html, IntoResponse, Response},
};
use fuelbook_core::{ValidationError, store::StoreError};
use thiserror::Error;

use crate::page;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Validation(#[from] ValidationError),
  #[error("{0}")]
  NotFound(String),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// A store that lost the vehicle between lookup and use still answers 404.
  pub fn store<E: StoreError>(e: E) -> Self {
    if e.is_not_found() {
      Error::NotFound(e.to_string())
    } else {
      Error::Store(Box::new(e))
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      Error::Validation(_) => StatusCode::BAD_REQUEST,
      Error::NotFound(_) => StatusCode::NOT_FOUND,
      Error::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  /// Log at a level matching the status.
  pub(crate) fn trace(&self) {
    match self {
      Error::Store(e) => tracing::error!(error = %e, "storage failure"),
      other => tracing::warn!(error = %other, "request rejected"),
    }
  }
}

impl From<fuelbook_core::Error> for Error {
  fn from(e: fuelbook_core::Error) -> Self {
    match e {
      fuelbook_core::Error::Validation(v) => Error::Validation(v),
      e @ (fuelbook_core::Error::VehicleNotFound(_)
      | fuelbook_core::Error::EventNotFound(_)) => Error::NotFound(e.to_string()),
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    self.trace();
    let status = self.status();
    (status, Html(page::error_page(status.as_u16(), &self.to_string()))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use fuelbook_core::vehicle::VehicleName;
  use fuelbook_store_sqlite::Error as SqliteError;

  use super::*;

  #[test]
  fn vanished_vehicle_from_store_is_404() {
    let golf = VehicleName::parse("golf").unwrap();
    let err = Error::store(SqliteError::VehicleNotFound(golf));
    assert!(matches!(err, Error::NotFound(_)), "{err:?}");
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
  }

  #[test]
  fn other_store_failures_are_500() {
    let err = Error::store(SqliteError::Corrupt { id: 7, reason: "bad date".into() });
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
  }
}
