//! Handlers for `/vehicles/{vehicle}/events` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/vehicles/{vehicle}/events` | Optional `?order=asc\|desc` (default `desc`) |
//! | `POST`   | `/vehicles/{vehicle}/events` | Body: `event_type` plus raw fields; 201 |
//! | `GET`    | `/vehicles/{vehicle}/events/{id}` | 404 if not found |
//! | `PUT`    | `/vehicles/{vehicle}/events/{id}` | Replaces every field; 404 if not found |
//! | `DELETE` | `/vehicles/{vehicle}/events/{id}` | 204; 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use fuelbook_core::{
  ValidationError,
  event::{EventId, EventType, ExpenseEvent, NewEvent, SortOrder},
  ledger::{RawEntry, normalize},
  store::LedgerStore,
};
use serde::{Deserialize, Serialize};

use crate::{
  api::{
    error::ApiError,
    extract::{ApiJson, ApiPath, ApiQuery},
  },
  require_event, require_vehicle,
};

// ─── Wire types ───────────────────────────────────────────────────────────────

/// A field that clients may send either as a JSON number or as text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
  Number(serde_json::Number),
  Text(String),
}

impl Scalar {
  fn into_text(self) -> String {
    match self {
      Scalar::Number(n) => n.to_string(),
      Scalar::Text(s) => s,
    }
  }
}

/// Request body for create and update. Validated by [`normalize`] exactly
/// like the HTML form.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EventBody {
  pub event_type:      Option<String>,
  pub date:            Option<String>,
  pub odometer:        Option<Scalar>,
  pub liters:          Option<Scalar>,
  pub price_per_liter: Option<Scalar>,
  pub cost:            Option<Scalar>,
  pub comment:         Option<String>,
}

impl EventBody {
  pub fn into_event(self) -> Result<NewEvent, ValidationError> {
    let event_type: EventType = self
      .event_type
      .as_deref()
      .ok_or(ValidationError::MissingField("event_type"))?
      .parse()?;

    let raw = RawEntry {
      date:            self.date,
      odometer:        self.odometer.map(Scalar::into_text),
      liters:          self.liters.map(Scalar::into_text),
      price_per_liter: self.price_per_liter.map(Scalar::into_text),
      cost:            self.cost.map(Scalar::into_text),
      comment:         self.comment,
    };
    normalize(&raw, event_type)
  }
}

/// A stored event as returned by the API: one flat object, every column
/// present, `cost` included for fuel rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventView {
  pub id:              EventId,
  pub date:            NaiveDate,
  pub event_type:      EventType,
  pub odometer:        Option<i64>,
  pub liters:          Option<f64>,
  pub price_per_liter: Option<f64>,
  pub cost:            Option<f64>,
  pub comment:         String,
}

impl From<ExpenseEvent> for EventView {
  fn from(event: ExpenseEvent) -> Self {
    Self {
      id:              event.id,
      date:            event.date,
      event_type:      event.event_type(),
      odometer:        event.odometer(),
      liters:          event.liters(),
      price_per_liter: event.price_per_liter(),
      cost:            event.cost(),
      comment:         event.comment,
    }
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(default)]
  pub order: SortOrder,
}

/// `GET /vehicles/{vehicle}/events[?order=asc|desc]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  ApiPath(vehicle): ApiPath<String>,
  ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Vec<EventView>>, ApiError>
where
  S: LedgerStore,
{
  let vehicle = require_vehicle(store.as_ref(), &vehicle).await?;
  let events = store
    .list_all(&vehicle, params.order)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(events.into_iter().map(EventView::from).collect()))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /vehicles/{vehicle}/events`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  ApiPath(vehicle): ApiPath<String>,
  ApiJson(body): ApiJson<EventBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LedgerStore,
{
  let vehicle = require_vehicle(store.as_ref(), &vehicle).await?;
  let event = body.into_event()?;

  let id = store
    .insert(&vehicle, event.clone())
    .await
    .map_err(ApiError::store)?;
  tracing::info!(%vehicle, id, "recorded event");

  let stored = ExpenseEvent::from_new(id, event);
  Ok((StatusCode::CREATED, Json(EventView::from(stored))))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /vehicles/{vehicle}/events/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  ApiPath((vehicle, id)): ApiPath<(String, EventId)>,
) -> Result<Json<EventView>, ApiError>
where
  S: LedgerStore,
{
  let vehicle = require_vehicle(store.as_ref(), &vehicle).await?;
  let event = require_event(store.as_ref(), &vehicle, id).await?;
  Ok(Json(event.into()))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /vehicles/{vehicle}/events/{id}`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  ApiPath((vehicle, id)): ApiPath<(String, EventId)>,
  ApiJson(body): ApiJson<EventBody>,
) -> Result<Json<EventView>, ApiError>
where
  S: LedgerStore,
{
  let vehicle = require_vehicle(store.as_ref(), &vehicle).await?;
  let event = body.into_event()?;

  let found = store
    .update(&vehicle, id, event.clone())
    .await
    .map_err(ApiError::store)?;
  if !found {
    return Err(fuelbook_core::Error::EventNotFound(id).into());
  }
  Ok(Json(ExpenseEvent::from_new(id, event).into()))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /vehicles/{vehicle}/events/{id}`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  ApiPath((vehicle, id)): ApiPath<(String, EventId)>,
) -> Result<StatusCode, ApiError>
where
  S: LedgerStore,
{
  let vehicle = require_vehicle(store.as_ref(), &vehicle).await?;
  if !store.delete(&vehicle, id).await.map_err(ApiError::store)? {
    return Err(fuelbook_core::Error::EventNotFound(id).into());
  }
  tracing::info!(%vehicle, id, "deleted event");
  Ok(StatusCode::NO_CONTENT)
}
