//! `GET /vehicles/{vehicle}/charts/{kind}`: one chart on its own page.

use axum::{
  extract::{Path, State},
  response::Html,
};
use fuelbook_core::{event::SortOrder, store::LedgerStore};

use crate::{
  AppState,
  chart::{ChartKind, embed},
  error::Error,
  page, require_vehicle,
};

pub async fn show<S>(
  State(state): State<AppState<S>>,
  Path((vehicle, kind)): Path<(String, ChartKind)>,
) -> Result<Html<String>, Error>
where
  S: LedgerStore + Clone + 'static,
{
  let vehicle = require_vehicle(state.store.as_ref(), &vehicle).await?;
  let events = state
    .store
    .list_all(&vehicle, SortOrder::Ascending)
    .await
    .map_err(Error::store)?;

  let figure = kind.figure(&events, &state.config);
  let chart = embed(&format!("chart-{}", kind.slug()), figure.as_ref());
  Ok(Html(page::chart_page(&vehicle, kind, &chart)))
}
