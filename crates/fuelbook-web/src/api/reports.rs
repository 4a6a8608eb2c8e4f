//! `GET /vehicles/{vehicle}/reports/{report}`: aggregated views as JSON.

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  response::{IntoResponse, Response},
};
use fuelbook_core::{
  event::SortOrder,
  report::{category_totals, cost_series, ledger_summary, monthly_efficiency},
  store::LedgerStore,
};
use serde::{Deserialize, Serialize};

use crate::{
  api::{error::ApiError, extract::ApiPath},
  require_vehicle,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Report {
  Cost,
  Categories,
  Efficiency,
  Summary,
}

/// One month of the efficiency report, keyed by its `YYYY-MM` label.
#[derive(Debug, Serialize)]
struct MonthRow {
  month:   String,
  average: f64,
  samples: usize,
}

pub async fn handler<S>(
  State(store): State<Arc<S>>,
  ApiPath((vehicle, report)): ApiPath<(String, Report)>,
) -> Result<Response, ApiError>
where
  S: LedgerStore,
{
  let vehicle = require_vehicle(store.as_ref(), &vehicle).await?;
  let events = store
    .list_all(&vehicle, SortOrder::Ascending)
    .await
    .map_err(ApiError::store)?;

  let response = match report {
    Report::Cost => Json(cost_series(&events)).into_response(),
    Report::Categories => Json(category_totals(&events)).into_response(),
    Report::Efficiency => {
      let rows: Vec<MonthRow> = monthly_efficiency(&events)
        .into_iter()
        .map(|m| MonthRow {
          month:   m.month.to_string(),
          average: m.average,
          samples: m.samples,
        })
        .collect();
      Json(rows).into_response()
    }
    Report::Summary => Json(ledger_summary(&events)).into_response(),
  };
  Ok(response)
}
