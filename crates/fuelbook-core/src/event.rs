//! Expense events: the rows of a vehicle ledger.
//!
//! Type-specific fields live in [`EventDetails`], so a maintenance entry can
//! never carry a fuel volume and a fuel entry's cost can never drift from
//! `liters × price_per_liter`.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Store-assigned row identifier.
pub type EventId = i64;

// ─── Event type ──────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
  Fuel,
  Maintenance,
  Other,
}

impl EventType {
  pub const ALL: [EventType; 3] =
    [EventType::Fuel, EventType::Maintenance, EventType::Other];

  /// The discriminant stored in the `event_type` column.
  pub fn as_str(&self) -> &'static str {
    match self {
      EventType::Fuel => "fuel",
      EventType::Maintenance => "maintenance",
      EventType::Other => "other",
    }
  }

  /// Human-readable label for pages and chart legends.
  pub fn label(&self) -> &'static str {
    match self {
      EventType::Fuel => "Fuel",
      EventType::Maintenance => "Maintenance",
      EventType::Other => "Other",
    }
  }
}

impl fmt::Display for EventType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for EventType {
  type Err = ValidationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "fuel" => Ok(EventType::Fuel),
      "maintenance" => Ok(EventType::Maintenance),
      "other" => Ok(EventType::Other),
      _ => Err(ValidationError::UnknownEventType(s.to_owned())),
    }
  }
}

// ─── Details ─────────────────────────────────────────────────────────────────

/// The fields that are valid for each event type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "lowercase")]
pub enum EventDetails {
  Fuel {
    odometer:        Option<i64>,
    liters:          Option<f64>,
    price_per_liter: Option<f64>,
  },
  Maintenance {
    odometer: Option<i64>,
    cost:     Option<f64>,
  },
  Other {
    cost: Option<f64>,
  },
}

impl EventDetails {
  pub fn event_type(&self) -> EventType {
    match self {
      Self::Fuel { .. } => EventType::Fuel,
      Self::Maintenance { .. } => EventType::Maintenance,
      Self::Other { .. } => EventType::Other,
    }
  }

  pub fn odometer(&self) -> Option<i64> {
    match self {
      Self::Fuel { odometer, .. } | Self::Maintenance { odometer, .. } => *odometer,
      Self::Other { .. } => None,
    }
  }

  pub fn liters(&self) -> Option<f64> {
    match self {
      Self::Fuel { liters, .. } => *liters,
      _ => None,
    }
  }

  pub fn price_per_liter(&self) -> Option<f64> {
    match self {
      Self::Fuel { price_per_liter, .. } => *price_per_liter,
      _ => None,
    }
  }

  /// Fuel cost is always derived; other types carry the supplied value.
  pub fn cost(&self) -> Option<f64> {
    match self {
      Self::Fuel { liters, price_per_liter, .. } => {
        Some((*liters)? * (*price_per_liter)?)
      }
      Self::Maintenance { cost, .. } | Self::Other { cost } => *cost,
    }
  }
}

// ─── Events ──────────────────────────────────────────────────────────────────

/// A validated event that has not been stored yet.
/// Produced by [`crate::ledger::normalize`]; input to insert and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
  pub date:    NaiveDate,
  #[serde(flatten)]
  pub details: EventDetails,
  pub comment: String,
}

/// A stored ledger row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseEvent {
  pub id:      EventId,
  pub date:    NaiveDate,
  #[serde(flatten)]
  pub details: EventDetails,
  pub comment: String,
}

impl ExpenseEvent {
  pub fn from_new(id: EventId, event: NewEvent) -> Self {
    Self {
      id,
      date: event.date,
      details: event.details,
      comment: event.comment,
    }
  }

  pub fn event_type(&self) -> EventType { self.details.event_type() }

  pub fn odometer(&self) -> Option<i64> { self.details.odometer() }

  pub fn liters(&self) -> Option<f64> { self.details.liters() }

  pub fn price_per_liter(&self) -> Option<f64> { self.details.price_per_liter() }

  pub fn cost(&self) -> Option<f64> { self.details.cost() }
}

/// Read order for [`crate::store::LedgerStore::list_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
  #[serde(alias = "asc")]
  Ascending,
  #[default]
  #[serde(alias = "desc")]
  Descending,
}

/// Sort `events` by date, breaking ties by id in the same direction.
pub fn sort_events(events: &mut [ExpenseEvent], order: SortOrder) {
  events.sort_by_key(|e| (e.date, e.id));
  if order == SortOrder::Descending {
    events.reverse();
  }
}
