//! `GET /`: the ledger page.

use axum::{
  extract::{Query, State},
  response::Html,
};
use fuelbook_core::{event::SortOrder, report::ledger_summary, store::LedgerStore};
use serde::Deserialize;

use crate::{
  AppState,
  chart::{ChartKind, embed},
  error::Error,
  page::{self, LedgerView},
  require_vehicle,
};

#[derive(Debug, Deserialize)]
pub struct IndexParams {
  pub vehicle: Option<String>,
}

/// Show `?vehicle=`, or the first vehicle by name when none is given.
pub async fn index<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<IndexParams>,
) -> Result<Html<String>, Error>
where
  S: LedgerStore + Clone + 'static,
{
  let store = state.store.as_ref();
  let vehicles = store.list_vehicles().await.map_err(Error::store)?;

  let selected = match params.vehicle.as_deref().filter(|v| !v.trim().is_empty()) {
    Some(raw) => Some(require_vehicle(store, raw).await?),
    None => vehicles.first().cloned(),
  };
  let Some(vehicle) = selected else {
    return Ok(Html(page::ledger_page(&vehicles, None, &state.config)));
  };

  let events = store
    .list_all(&vehicle, SortOrder::Descending)
    .await
    .map_err(Error::store)?;
  let last_odometer = store.last_odometer(&vehicle).await.map_err(Error::store)?;
  let summary = ledger_summary(&events);

  let charts = ChartKind::ALL
    .iter()
    .map(|kind| {
      let figure = kind.figure(&events, &state.config);
      embed(&format!("chart-{}", kind.slug()), figure.as_ref())
    })
    .collect();

  let view = LedgerView {
    vehicle: &vehicle,
    events: &events,
    last_odometer,
    today: chrono::Local::now().date_naive(),
    summary: &summary,
    charts,
  };
  Ok(Html(page::ledger_page(&vehicles, Some(&view), &state.config)))
}
