//! `POST /vehicles`: create a vehicle ledger.

use axum::{
  Form,
  extract::State,
  response::Redirect,
};
use fuelbook_core::{store::LedgerStore, vehicle::VehicleName};
use serde::Deserialize;

use crate::{AppState, error::Error, handlers::to_ledger};

#[derive(Debug, Deserialize)]
pub struct CreateForm {
  #[serde(default)]
  pub name: String,
}

/// Creating an existing vehicle is a no-op that still redirects to it.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Form(form): Form<CreateForm>,
) -> Result<Redirect, Error>
where
  S: LedgerStore + Clone + 'static,
{
  let vehicle = VehicleName::parse(&form.name)?;
  state.store.create(&vehicle).await.map_err(Error::store)?;
  Ok(to_ledger(&vehicle))
}
