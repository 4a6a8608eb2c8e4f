//! Normalisation of raw form input into ledger events.
//!
//! Every write path (insert and full-row update, HTML form or JSON API) goes
//! through [`normalize`]. It is pure: identical input always yields an
//! identical [`NewEvent`] or the same [`ValidationError`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  ValidationError,
  event::{EventDetails, EventType, NewEvent},
};

/// The date format accepted from forms and the API.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Untyped fields exactly as submitted. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
  #[serde(default)]
  pub date:            Option<String>,
  #[serde(default)]
  pub odometer:        Option<String>,
  #[serde(default)]
  pub liters:          Option<String>,
  #[serde(default)]
  pub price_per_liter: Option<String>,
  #[serde(default)]
  pub cost:            Option<String>,
  #[serde(default)]
  pub comment:         Option<String>,
}

/// Validate `raw` as an event of type `event_type`.
///
/// Fields that do not belong to `event_type` are ignored, so a fuel entry's
/// cost is always `liters × price_per_liter` and a maintenance entry never
/// carries a fuel volume.
pub fn normalize(
  raw: &RawEntry,
  event_type: EventType,
) -> Result<NewEvent, ValidationError> {
  let date = parse_date(raw.date.as_deref())?;

  let details = match event_type {
    EventType::Fuel => EventDetails::Fuel {
      odometer:        parse_odometer(raw.odometer.as_deref())?,
      liters:          parse_positive("liters", raw.liters.as_deref())?,
      price_per_liter: parse_positive(
        "price_per_liter",
        raw.price_per_liter.as_deref(),
      )?,
    },
    EventType::Maintenance => EventDetails::Maintenance {
      odometer: parse_odometer(raw.odometer.as_deref())?,
      cost:     parse_cost(raw.cost.as_deref())?,
    },
    EventType::Other => EventDetails::Other {
      cost: parse_cost(raw.cost.as_deref())?,
    },
  };

  let comment = raw
    .comment
    .as_deref()
    .map(str::trim)
    .unwrap_or_default()
    .to_owned();

  Ok(NewEvent { date, details, comment })
}

// ─── Field parsers ───────────────────────────────────────────────────────────

/// `None` for absent or blank input, the trimmed text otherwise.
fn present(value: Option<&str>) -> Option<&str> {
  value.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(value: Option<&str>) -> Result<NaiveDate, ValidationError> {
  let text = present(value).ok_or(ValidationError::MissingField("date"))?;
  NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| {
    ValidationError::Unparseable {
      field:    "date",
      expected: "date (YYYY-MM-DD)",
      value:    text.to_owned(),
    }
  })
}

fn parse_odometer(value: Option<&str>) -> Result<Option<i64>, ValidationError> {
  let Some(text) = present(value) else {
    return Ok(None);
  };
  let reading: i64 = text.parse().map_err(|_| ValidationError::Unparseable {
    field:    "odometer",
    expected: "integer",
    value:    text.to_owned(),
  })?;
  if reading < 0 {
    return Err(ValidationError::OutOfRange {
      field:  "odometer",
      value:  text.to_owned(),
      reason: "must not be negative",
    });
  }
  Ok(Some(reading))
}

fn parse_number(
  field: &'static str,
  text: &str,
) -> Result<f64, ValidationError> {
  let number: f64 = text.parse().map_err(|_| ValidationError::Unparseable {
    field,
    expected: "number",
    value: text.to_owned(),
  })?;
  if !number.is_finite() {
    return Err(ValidationError::OutOfRange {
      field,
      value: text.to_owned(),
      reason: "must be finite",
    });
  }
  Ok(number)
}

fn parse_positive(
  field: &'static str,
  value: Option<&str>,
) -> Result<Option<f64>, ValidationError> {
  let Some(text) = present(value) else {
    return Ok(None);
  };
  let number = parse_number(field, text)?;
  if number <= 0.0 {
    return Err(ValidationError::OutOfRange {
      field,
      value: text.to_owned(),
      reason: "must be greater than zero",
    });
  }
  Ok(Some(number))
}

fn parse_cost(value: Option<&str>) -> Result<Option<f64>, ValidationError> {
  present(value).map(|text| parse_number("cost", text)).transpose()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn raw(pairs: &[(&str, &str)]) -> RawEntry {
    let mut entry = RawEntry::default();
    for (key, value) in pairs {
      let slot = match *key {
        "date" => &mut entry.date,
        "odometer" => &mut entry.odometer,
        "liters" => &mut entry.liters,
        "price_per_liter" => &mut entry.price_per_liter,
        "cost" => &mut entry.cost,
        "comment" => &mut entry.comment,
        other => panic!("unknown field {other}"),
      };
      *slot = Some((*value).to_owned());
    }
    entry
  }

  #[test]
  fn fuel_cost_is_exact_product() {
    let cases = [(10.0, 1.5), (8.0, 1.6), (43.27, 1.789), (0.5, 2.0)];
    for (liters, price) in cases {
      let event = normalize(
        &raw(&[
          ("date", "2024-01-01"),
          ("liters", liters.to_string().as_str()),
          ("price_per_liter", price.to_string().as_str()),
        ]),
        EventType::Fuel,
      )
      .unwrap();
      assert_eq!(event.details.cost(), Some(liters * price));
    }
  }

  #[test]
  fn fuel_ignores_supplied_cost() {
    let event = normalize(
      &raw(&[
        ("date", "2024-01-01"),
        ("liters", "10"),
        ("price_per_liter", "1.5"),
        ("cost", "999"),
      ]),
      EventType::Fuel,
    )
    .unwrap();
    assert_eq!(event.details.cost(), Some(15.0));
  }

  #[test]
  fn fuel_without_price_has_no_cost() {
    let event = normalize(
      &raw(&[("date", "2024-01-01"), ("odometer", "1200"), ("liters", "30")]),
      EventType::Fuel,
    )
    .unwrap();
    assert_eq!(event.details.cost(), None);
    assert_eq!(event.details.odometer(), Some(1200));
  }

  #[test]
  fn maintenance_and_other_drop_fuel_fields() {
    let input = raw(&[
      ("date", "2024-05-02"),
      ("odometer", "54000"),
      ("liters", "40"),
      ("price_per_liter", "1.9"),
      ("cost", "120.50"),
    ]);

    let m = normalize(&input, EventType::Maintenance).unwrap();
    assert_eq!(
      m.details,
      EventDetails::Maintenance { odometer: Some(54000), cost: Some(120.5) }
    );

    let o = normalize(&input, EventType::Other).unwrap();
    assert_eq!(o.details, EventDetails::Other { cost: Some(120.5) });
    assert_eq!(o.details.liters(), None);
    assert_eq!(o.details.price_per_liter(), None);
    assert_eq!(o.details.odometer(), None);
  }

  #[test]
  fn blank_optionals_resolve_to_none() {
    let event = normalize(
      &raw(&[
        ("date", "2024-01-01"),
        ("odometer", ""),
        ("cost", "   "),
      ]),
      EventType::Maintenance,
    )
    .unwrap();
    assert_eq!(event.details, EventDetails::Maintenance { odometer: None, cost: None });
    assert_eq!(event.comment, "");
  }

  #[test]
  fn comment_is_trimmed() {
    let event = normalize(
      &raw(&[("date", "2024-01-01"), ("comment", "  new tyres \n")]),
      EventType::Other,
    )
    .unwrap();
    assert_eq!(event.comment, "new tyres");
  }

  #[test]
  fn date_is_required() {
    assert_eq!(
      normalize(&RawEntry::default(), EventType::Other),
      Err(ValidationError::MissingField("date"))
    );
    assert!(matches!(
      normalize(&raw(&[("date", "01.02.2024")]), EventType::Other),
      Err(ValidationError::Unparseable { field: "date", .. })
    ));
  }

  #[test]
  fn unparseable_numbers_are_rejected() {
    let cases = [
      ("odometer", "12.5k", EventType::Fuel),
      ("liters", "forty", EventType::Fuel),
      ("price_per_liter", "1,79", EventType::Fuel),
      ("cost", "abc", EventType::Maintenance),
    ];
    for (field, value, et) in cases {
      let result = normalize(&raw(&[("date", "2024-01-01"), (field, value)]), et);
      assert!(
        matches!(result, Err(ValidationError::Unparseable { .. })),
        "{field}={value:?} gave {result:?}"
      );
    }
  }

  #[test]
  fn out_of_range_values_are_rejected() {
    let cases = [
      ("odometer", "-5", EventType::Fuel),
      ("liters", "0", EventType::Fuel),
      ("price_per_liter", "-1.2", EventType::Fuel),
      ("liters", "inf", EventType::Fuel),
      ("cost", "NaN", EventType::Other),
    ];
    for (field, value, et) in cases {
      let result = normalize(&raw(&[("date", "2024-01-01"), (field, value)]), et);
      assert!(
        matches!(result, Err(ValidationError::OutOfRange { .. })),
        "{field}={value:?} gave {result:?}"
      );
    }
  }

  #[test]
  fn negative_cost_is_allowed() {
    let event = normalize(
      &raw(&[("date", "2024-01-01"), ("cost", "-20")]),
      EventType::Other,
    )
    .unwrap();
    assert_eq!(event.details.cost(), Some(-20.0));
  }

  #[test]
  fn normalisation_is_deterministic() {
    let input = raw(&[
      ("date", "2024-02-29"),
      ("odometer", "1500"),
      ("liters", "35.2"),
      ("price_per_liter", "1.819"),
      ("comment", "leap day"),
    ]);
    assert_eq!(
      normalize(&input, EventType::Fuel),
      normalize(&input, EventType::Fuel)
    );
  }
}
