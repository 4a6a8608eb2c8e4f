//! JSON error responses for the API routes.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use fuelbook_core::{ValidationError, store::StoreError};
use serde_json::json;
use thiserror::Error;

/// Rendered as `{"error": "..."}` with the matching status.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// An extractor failed before the handler ran.
  #[error("{message}")]
  Rejected { status: StatusCode, message: String },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store<E: StoreError>(e: E) -> Self { crate::Error::store(e).into() }
}

impl From<ValidationError> for ApiError {
  fn from(e: ValidationError) -> Self { ApiError::BadRequest(e.to_string()) }
}

impl From<fuelbook_core::Error> for ApiError {
  fn from(e: fuelbook_core::Error) -> Self { crate::Error::from(e).into() }
}

impl From<crate::Error> for ApiError {
  fn from(e: crate::Error) -> Self {
    match e {
      crate::Error::Validation(v) => v.into(),
      crate::Error::NotFound(m) => ApiError::NotFound(m),
      crate::Error::Store(e) => ApiError::Store(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Rejected { status, message } => (*status, message.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "storage failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    if status.is_client_error() {
      tracing::warn!(%status, error = %message, "api request rejected");
    }
    (status, Json(json!({ "error": message }))).into_response()
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
    let resp = ApiError::store(SqliteError::VehicleNotFound(golf)).into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[test]
  fn other_store_failures_are_500() {
    let err = ApiError::store(SqliteError::Corrupt { id: 7, reason: "bad date".into() });
    assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
  }
}
