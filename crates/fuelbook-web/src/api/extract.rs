//! Extractors whose rejections render as [`ApiError`] JSON bodies instead of
//! axum's plain-text defaults.

use axum::{
  extract::{
    FromRequest, FromRequestParts,
    rejection::{JsonRejection, PathRejection, QueryRejection},
  },
  http::StatusCode,
};

use crate::api::error::ApiError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

fn rejected(status: StatusCode, message: String) -> ApiError {
  ApiError::Rejected { status, message }
}

impl From<JsonRejection> for ApiError {
  fn from(r: JsonRejection) -> Self { rejected(r.status(), r.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(r: PathRejection) -> Self { rejected(r.status(), r.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(r: QueryRejection) -> Self { rejected(r.status(), r.body_text()) }
}
