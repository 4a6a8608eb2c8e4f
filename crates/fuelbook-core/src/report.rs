//! Reporting views derived from a vehicle's ledger.
//!
//! All functions are pure and accept events in any order; they sort their
//! own working copy by date (then id).
//!
//! Cost rule shared by every view: fuel cost is recomputed from
//! `liters × price_per_liter`, every other type uses the stored value.

use std::{collections::HashMap, fmt};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::event::{EventType, ExpenseEvent, SortOrder, sort_events};

// ─── Cost series ─────────────────────────────────────────────────────────────

/// One fill-up on the cost-over-time chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostPoint {
  pub date:       NaiveDate,
  pub cost:       f64,
  pub cumulative: f64,
  pub comment:    String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "points", rename_all = "snake_case")]
pub enum CostSeries {
  /// Nothing to plot; the caller renders a placeholder.
  NoData,
  Points(Vec<CostPoint>),
}

impl CostSeries {
  pub fn points(&self) -> &[CostPoint] {
    match self {
      Self::NoData => &[],
      Self::Points(points) => points,
    }
  }
}

/// Per-fill fuel cost and its running total, ascending by date.
///
/// Fuel events without both `liters` and `price_per_liter` have no cost and
/// contribute no point.
pub fn cost_series(events: &[ExpenseEvent]) -> CostSeries {
  let mut cumulative = 0.0;
  let points: Vec<CostPoint> = fuel_ascending(events)
    .into_iter()
    .filter_map(|event| {
      let cost = event.cost()?;
      cumulative += cost;
      Some(CostPoint {
        date: event.date,
        cost,
        cumulative,
        comment: event.comment,
      })
    })
    .collect();

  if points.is_empty() {
    CostSeries::NoData
  } else {
    CostSeries::Points(points)
  }
}

// ─── Category totals ─────────────────────────────────────────────────────────

/// Summed cost per event type. Missing costs count as zero; types without any
/// event are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotals(pub HashMap<EventType, f64>);

impl CategoryTotals {
  pub fn get(&self, event_type: EventType) -> Option<f64> {
    self.0.get(&event_type).copied()
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  /// Totals in display order (fuel, maintenance, other).
  pub fn sorted(&self) -> Vec<(EventType, f64)> {
    EventType::ALL
      .into_iter()
      .filter_map(|et| self.get(et).map(|total| (et, total)))
      .collect()
  }

  pub fn grand_total(&self) -> f64 { self.0.values().sum() }
}

pub fn category_totals(events: &[ExpenseEvent]) -> CategoryTotals {
  let mut totals = HashMap::new();
  for event in events {
    *totals.entry(event.event_type()).or_insert(0.0) +=
      event.cost().unwrap_or(0.0);
  }
  CategoryTotals(totals)
}

// ─── Monthly efficiency ──────────────────────────────────────────────────────

/// A calendar month, ordered chronologically and displayed as `YYYY-MM`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct YearMonth {
  pub year:  i32,
  pub month: u32,
}

impl YearMonth {
  pub fn of(date: NaiveDate) -> Self {
    Self { year: date.year(), month: date.month() }
  }
}

impl fmt::Display for YearMonth {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:04}-{:02}", self.year, self.month)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyEfficiency {
  pub month:   YearMonth,
  /// Arithmetic mean of the month's samples, volume per 100 distance units.
  pub average: f64,
  pub samples: usize,
}

/// A single consumption measurement between two consecutive fill-ups.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Sample {
  date:     NaiveDate,
  liters:   f64,
  distance: i64,
}

impl Sample {
  fn per_100(&self) -> f64 { self.liters / self.distance as f64 * 100.0 }
}

/// Consumption samples from consecutive fuel events.
///
/// A pair yields a sample only when both odometers are present, the reading
/// increased, and the later fill has a volume. Non-increasing readings are
/// data-entry errors or rollovers and are skipped.
fn consumption_samples(events: &[ExpenseEvent]) -> Vec<Sample> {
  let fuel = fuel_ascending(events);
  fuel
    .windows(2)
    .filter_map(|pair| {
      let (prev, curr) = (&pair[0], &pair[1]);
      let distance = curr.odometer()?.checked_sub(prev.odometer()?)?;
      if distance <= 0 {
        return None;
      }
      Some(Sample { date: curr.date, liters: curr.liters()?, distance })
    })
    .collect()
}

/// Average consumption per 100 distance units for each month with samples,
/// ascending by month.
pub fn monthly_efficiency(events: &[ExpenseEvent]) -> Vec<MonthlyEfficiency> {
  let mut by_month: std::collections::BTreeMap<YearMonth, (f64, usize)> =
    Default::default();
  for sample in consumption_samples(events) {
    let slot = by_month.entry(YearMonth::of(sample.date)).or_default();
    slot.0 += sample.per_100();
    slot.1 += 1;
  }

  by_month
    .into_iter()
    .map(|(month, (sum, samples))| MonthlyEfficiency {
      month,
      average: sum / samples as f64,
      samples,
    })
    .collect()
}

// ─── Summary ─────────────────────────────────────────────────────────────────

/// Headline figures for a ledger page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
  pub event_count:    usize,
  pub total_cost:     f64,
  pub total_liters:   f64,
  /// Distance-weighted consumption over every sampled interval.
  pub overall_per_100: Option<f64>,
}

pub fn ledger_summary(events: &[ExpenseEvent]) -> LedgerSummary {
  let samples = consumption_samples(events);
  let sampled_liters: f64 = samples.iter().map(|s| s.liters).sum();
  // Each distance fits in i64, their sum need not.
  let sampled_distance: f64 = samples.iter().map(|s| s.distance as f64).sum();

  LedgerSummary {
    event_count:     events.len(),
    total_cost:      category_totals(events).grand_total(),
    total_liters:    events.iter().filter_map(ExpenseEvent::liters).sum(),
    overall_per_100: (sampled_distance > 0.0)
      .then(|| sampled_liters / sampled_distance * 100.0),
  }
}

fn fuel_ascending(events: &[ExpenseEvent]) -> Vec<ExpenseEvent> {
  let mut fuel: Vec<ExpenseEvent> = events
    .iter()
    .filter(|e| e.event_type() == EventType::Fuel)
    .cloned()
    .collect();
  sort_events(&mut fuel, SortOrder::Ascending);
  fuel
}
