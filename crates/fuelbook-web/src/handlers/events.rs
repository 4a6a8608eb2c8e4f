//! Event form handlers: add, edit, update and delete a ledger row.

use axum::{
  Form,
  extract::{Path, State},
  response::{Html, Redirect},
};
use fuelbook_core::{
  ValidationError,
  event::{EventId, EventType, NewEvent},
  ledger::{RawEntry, normalize},
  store::LedgerStore,
};
use serde::Deserialize;

use crate::{
  AppState,
  error::Error,
  handlers::to_ledger,
  page, require_event, require_vehicle,
};

/// The entry form as submitted. Every field is text; validation happens in
/// [`normalize`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EventForm {
  pub event_type:      Option<String>,
  pub date:            Option<String>,
  pub odometer:        Option<String>,
  pub liters:          Option<String>,
  pub price_per_liter: Option<String>,
  pub cost:            Option<String>,
  pub comment:         Option<String>,
}

impl EventForm {
  pub fn into_event(self) -> Result<NewEvent, ValidationError> {
    let event_type: EventType = self
      .event_type
      .as_deref()
      .filter(|s| !s.trim().is_empty())
      .ok_or(ValidationError::MissingField("event_type"))?
      .parse()?;

    let raw = RawEntry {
      date:            self.date,
      odometer:        self.odometer,
      liters:          self.liters,
      price_per_liter: self.price_per_liter,
      cost:            self.cost,
      comment:         self.comment,
    };
    normalize(&raw, event_type)
  }
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /vehicles/{vehicle}/events`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Path(vehicle): Path<String>,
  Form(form): Form<EventForm>,
) -> Result<Redirect, Error>
where
  S: LedgerStore + Clone + 'static,
{
  let vehicle = require_vehicle(state.store.as_ref(), &vehicle).await?;
  let event = form.into_event()?;

  let id = state.store.insert(&vehicle, event).await.map_err(Error::store)?;
  tracing::info!(%vehicle, id, "recorded event");
  Ok(to_ledger(&vehicle))
}

// ─── Edit ─────────────────────────────────────────────────────────────────────

/// `GET /vehicles/{vehicle}/events/{id}/edit`
pub async fn edit<S>(
  State(state): State<AppState<S>>,
  Path((vehicle, id)): Path<(String, EventId)>,
) -> Result<Html<String>, Error>
where
  S: LedgerStore + Clone + 'static,
{
  let vehicle = require_vehicle(state.store.as_ref(), &vehicle).await?;
  let event = require_event(state.store.as_ref(), &vehicle, id).await?;
  Ok(Html(page::edit_page(&vehicle, &event)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `POST /vehicles/{vehicle}/events/{id}`: replaces every field of the row.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path((vehicle, id)): Path<(String, EventId)>,
  Form(form): Form<EventForm>,
) -> Result<Redirect, Error>
where
  S: LedgerStore + Clone + 'static,
{
  let vehicle = require_vehicle(state.store.as_ref(), &vehicle).await?;
  let event = form.into_event()?;

  if !state.store.update(&vehicle, id, event).await.map_err(Error::store)? {
    return Err(fuelbook_core::Error::EventNotFound(id).into());
  }
  Ok(to_ledger(&vehicle))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `POST /vehicles/{vehicle}/events/{id}/delete`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Path((vehicle, id)): Path<(String, EventId)>,
) -> Result<Redirect, Error>
where
  S: LedgerStore + Clone + 'static,
{
  let vehicle = require_vehicle(state.store.as_ref(), &vehicle).await?;

  if !state.store.delete(&vehicle, id).await.map_err(Error::store)? {
    return Err(fuelbook_core::Error::EventNotFound(id).into());
  }
  tracing::info!(%vehicle, id, "deleted event");
  Ok(to_ledger(&vehicle))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn form(event_type: &str) -> EventForm {
    EventForm {
      event_type: Some(event_type.into()),
      date: Some("2024-06-01".into()),
      liters: Some("20".into()),
      price_per_liter: Some("2".into()),
      cost: Some("5".into()),
      ..EventForm::default()
    }
  }

  #[test]
  fn event_type_is_case_insensitive() {
    let event = form(" Fuel ").into_event().unwrap();
    assert_eq!(event.details.event_type(), EventType::Fuel);
    assert_eq!(event.details.cost(), Some(40.0));
  }

  #[test]
  fn fields_of_other_types_are_dropped() {
    let event = form("other").into_event().unwrap();
    assert_eq!(event.details.liters(), None);
    assert_eq!(event.details.cost(), Some(5.0));
  }

  #[test]
  fn missing_event_type_is_rejected() {
    let err = EventForm::default().into_event().unwrap_err();
    assert_eq!(err, ValidationError::MissingField("event_type"));
  }
}
