//! Encoding and decoding helpers between ledger events and `expenses` rows.
//!
//! Dates are stored as `YYYY-MM-DD` text so lexical order is chronological.
//! The event type is stored as its lowercase discriminant.

use chrono::NaiveDate;
use fuelbook_core::{
  event::{EventDetails, EventId, EventType, ExpenseEvent, NewEvent},
  ledger::DATE_FORMAT,
};

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(date: NaiveDate) -> String { date.format(DATE_FORMAT).to_string() }

pub fn decode_date(id: EventId, s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| Error::Corrupt {
    id,
    reason: format!("bad date {s:?}: {e}"),
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column values for an INSERT or UPDATE, in schema order (without `id`).
pub struct RowValues {
  pub date:            String,
  pub event_type:      &'static str,
  pub odometer:        Option<i64>,
  pub liters:          Option<f64>,
  pub price_per_liter: Option<f64>,
  pub cost:            Option<f64>,
  pub comment:         String,
}

impl RowValues {
  /// Flatten `event` into columns. The fuel cost column is always written as
  /// the product of its volume and price.
  pub fn from_event(event: NewEvent) -> Self {
    let details = &event.details;
    Self {
      date:            encode_date(event.date),
      event_type:      details.event_type().as_str(),
      odometer:        details.odometer(),
      liters:          details.liters(),
      price_per_liter: details.price_per_liter(),
      cost:            details.cost(),
      comment:         event.comment,
    }
  }
}

/// Raw values read directly from an `expenses` row.
pub struct RawEvent {
  pub id:              EventId,
  pub date:            String,
  pub event_type:      String,
  pub odometer:        Option<i64>,
  pub liters:          Option<f64>,
  pub price_per_liter: Option<f64>,
  pub cost:            Option<f64>,
  pub comment:         Option<String>,
}

/// Column list matching [`RawEvent::from_row`].
pub const COLUMNS: &str =
  "id, date, event_type, odometer, liters, price_per_liter, cost, comment";

impl RawEvent {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:              row.get(0)?,
      date:            row.get(1)?,
      event_type:      row.get(2)?,
      odometer:        row.get(3)?,
      liters:          row.get(4)?,
      price_per_liter: row.get(5)?,
      cost:            row.get(6)?,
      comment:         row.get(7)?,
    })
  }

  /// Decode into a typed event. The stored fuel cost is ignored; it is
  /// derived again from volume and price.
  pub fn into_event(self) -> Result<ExpenseEvent> {
    let date = decode_date(self.id, &self.date)?;
    let event_type: EventType =
      self.event_type.parse().map_err(|_| Error::Corrupt {
        id:     self.id,
        reason: format!("unknown event type {:?}", self.event_type),
      })?;

    let details = match event_type {
      EventType::Fuel => EventDetails::Fuel {
        odometer:        self.odometer,
        liters:          self.liters,
        price_per_liter: self.price_per_liter,
      },
      EventType::Maintenance => EventDetails::Maintenance {
        odometer: self.odometer,
        cost:     self.cost,
      },
      EventType::Other => EventDetails::Other { cost: self.cost },
    };

    Ok(ExpenseEvent {
      id: self.id,
      date,
      details,
      comment: self.comment.unwrap_or_default(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn raw(event_type: &str) -> RawEvent {
    RawEvent {
      id:              1,
      date:            "2024-03-09".into(),
      event_type:      event_type.into(),
      odometer:        Some(4200),
      liters:          Some(10.0),
      price_per_liter: Some(2.0),
      cost:            Some(999.0),
      comment:         None,
    }
  }

  #[test]
  fn fuel_cost_is_recomputed_on_read() {
    let event = raw("fuel").into_event().unwrap();
    assert_eq!(event.cost(), Some(20.0));
    assert_eq!(event.comment, "");
  }

  #[test]
  fn stored_cost_is_trusted_for_other_types() {
    let event = raw("maintenance").into_event().unwrap();
    assert_eq!(event.cost(), Some(999.0));
    assert_eq!(event.liters(), None);

    let event = raw("other").into_event().unwrap();
    assert_eq!(event.odometer(), None);
  }

  #[test]
  fn bad_rows_are_reported_as_corrupt() {
    assert!(matches!(raw("tanken").into_event(), Err(Error::Corrupt { id: 1, .. })));

    let mut bad_date = raw("fuel");
    bad_date.date = "09.03.2024".into();
    assert!(matches!(bad_date.into_event(), Err(Error::Corrupt { .. })));
  }

  #[test]
  fn row_values_carry_derived_fuel_cost() {
    let values = RowValues::from_event(NewEvent {
      date:    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
      details: EventDetails::Fuel {
        odometer:        None,
        liters:          Some(10.0),
        price_per_liter: Some(1.5),
      },
      comment: "x".into(),
    });
    assert_eq!(values.date, "2024-01-02");
    assert_eq!(values.event_type, "fuel");
    assert_eq!(values.cost, Some(15.0));
  }
}
