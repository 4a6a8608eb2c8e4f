//! HTTP layer for the fuelbook vehicle ledger.
//!
//! Exposes an axum [`Router`] serving the HTML ledger pages and chart pages,
//! with the JSON API from [`api`] nested under `/api`. Everything is backed
//! by any [`LedgerStore`].

pub mod api;
pub mod chart;
pub mod error;
pub mod handlers;
pub mod page;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use fuelbook_core::{
  event::{EventId, ExpenseEvent},
  store::LedgerStore,
  vehicle::VehicleName,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `fuelbook.toml` and
/// `FUELBOOK_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  /// Directory holding one `<vehicle>.db` file per vehicle.
  pub data_dir:        PathBuf,
  pub currency_symbol: String,
  pub distance_unit:   String,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:            "0.0.0.0".to_owned(),
      port:            5000,
      data_dir:        PathBuf::from("data"),
      currency_symbol: "€".to_owned(),
      distance_unit:   "km".to_owned(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all HTML handlers.
#[derive(Clone)]
pub struct AppState<S: LedgerStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application router.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: LedgerStore + Clone + 'static,
{
  let api = api::api_router(state.store.clone());

  Router::new()
    .route("/",                                         get(handlers::ledger::index::<S>))
    .route("/vehicles",                                 post(handlers::vehicles::create::<S>))
    .route("/vehicles/{vehicle}/events",                post(handlers::events::create::<S>))
    .route("/vehicles/{vehicle}/events/{id}",           post(handlers::events::update::<S>))
    .route("/vehicles/{vehicle}/events/{id}/edit",      get(handlers::events::edit::<S>))
    .route("/vehicles/{vehicle}/events/{id}/delete",    post(handlers::events::delete::<S>))
    .route("/vehicles/{vehicle}/charts/{kind}",         get(handlers::charts::show::<S>))
    .with_state(state)
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

// ─── Lookup helpers ──────────────────────────────────────────────────────────

/// Parse `raw` as a vehicle name and make sure its ledger exists.
pub(crate) async fn require_vehicle<S: LedgerStore>(
  store: &S,
  raw: &str,
) -> Result<VehicleName, Error> {
  let vehicle = VehicleName::parse(raw)?;
  if !store.has_vehicle(&vehicle).await.map_err(Error::store)? {
    return Err(fuelbook_core::Error::VehicleNotFound(vehicle.into()).into());
  }
  Ok(vehicle)
}

/// Fetch row `id` of `vehicle`, failing with not-found when absent.
pub(crate) async fn require_event<S: LedgerStore>(
  store: &S,
  vehicle: &VehicleName,
  id: EventId,
) -> Result<ExpenseEvent, Error> {
  store
    .get_by_id(vehicle, id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| fuelbook_core::Error::EventNotFound(id).into())
}

// ─── Integration tests ────────────────────────────────────────────────────────
