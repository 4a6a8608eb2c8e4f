//! Handlers for `/vehicles`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/vehicles` | Names sorted ascending |
//! | `POST` | `/vehicles` | Body: `{"name":"golf"}`; 201 if created, 200 if it existed |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use fuelbook_core::{store::LedgerStore, vehicle::VehicleName};
use serde::Deserialize;

use crate::api::{error::ApiError, extract::ApiJson};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /vehicles`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<VehicleName>>, ApiError>
where
  S: LedgerStore,
{
  let vehicles = store.list_vehicles().await.map_err(ApiError::store)?;
  Ok(Json(vehicles.into_iter().collect()))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name: String,
}

/// `POST /vehicles`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  ApiJson(body): ApiJson<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LedgerStore,
{
  let vehicle = VehicleName::parse(&body.name)?;
  let created = store.create(&vehicle).await.map_err(ApiError::store)?;
  let status = if created { StatusCode::CREATED } else { StatusCode::OK };
  Ok((status, Json(vehicle)))
}
