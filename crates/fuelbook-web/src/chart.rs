//! Plotly figure construction.
//!
//! Figures are built server-side as JSON and drawn in the browser by
//! `plotly.js` (loaded from its CDN by the page layout). An empty report
//! produces no figure; [`embed`] then renders a placeholder paragraph.

use fuelbook_core::{
  event::ExpenseEvent,
  report::{
    CategoryTotals, CostSeries, MonthlyEfficiency, category_totals, cost_series,
    monthly_efficiency,
  },
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{ServerConfig, page::escape};

const PRIMARY: &str = "#1f77b4";
const SECONDARY: &str = "#ff7f0e";

pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// The three report charts, addressed by their URL segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
  Cost,
  Categories,
  Efficiency,
}

impl ChartKind {
  pub const ALL: [ChartKind; 3] =
    [ChartKind::Cost, ChartKind::Categories, ChartKind::Efficiency];

  pub fn slug(&self) -> &'static str {
    match self {
      ChartKind::Cost => "cost",
      ChartKind::Categories => "categories",
      ChartKind::Efficiency => "efficiency",
    }
  }

  pub fn title(&self) -> &'static str {
    match self {
      ChartKind::Cost => "Fuel cost overview",
      ChartKind::Categories => "Cost by category",
      ChartKind::Efficiency => "Consumption by month",
    }
  }

  /// Aggregate `events` and build this chart's figure.
  pub fn figure(&self, events: &[ExpenseEvent], config: &ServerConfig) -> Option<Value> {
    match self {
      ChartKind::Cost => cost_figure(&cost_series(events), config),
      ChartKind::Categories => category_figure(&category_totals(events), config),
      ChartKind::Efficiency => efficiency_figure(&monthly_efficiency(events), config),
    }
  }
}

// ─── Figures ─────────────────────────────────────────────────────────────────

/// Cost per fill-up on the left axis, cumulative cost on the right.
pub fn cost_figure(series: &CostSeries, config: &ServerConfig) -> Option<Value> {
  let points = series.points();
  if points.is_empty() {
    return None;
  }
  let currency = &config.currency_symbol;

  let dates: Vec<String> = points.iter().map(|p| p.date.to_string()).collect();
  let costs: Vec<f64> = points.iter().map(|p| round2(p.cost)).collect();
  let cumulative: Vec<f64> = points.iter().map(|p| round2(p.cumulative)).collect();
  let comments: Vec<&str> = points
    .iter()
    .map(|p| if p.comment.is_empty() { "–" } else { p.comment.as_str() })
    .collect();

  let mut layout = dark_layout(ChartKind::Cost.title());
  layout["hovermode"] = json!("x unified");
  layout["xaxis"] = json!({ "title": { "text": "Date" } });
  layout["yaxis"] = json!({ "title": { "text": format!("Cost per fill-up ({currency})") } });
  layout["yaxis2"] = json!({
    "title": { "text": format!("Cumulative cost ({currency})") },
    "overlaying": "y",
    "side": "right",
  });

  Some(json!({
    "data": [
      {
        "type": "scatter",
        "mode": "lines+markers",
        "name": "Per fill-up",
        "x": dates,
        "y": costs,
        "line": { "shape": "linear", "color": PRIMARY, "width": 3 },
        "marker": { "size": 6, "opacity": 0.8 },
        "hovertemplate": format!("%{{y}}{currency}"),
      },
      {
        "type": "scatter",
        "mode": "lines+markers",
        "name": "Cumulative",
        "x": dates,
        "y": cumulative,
        "yaxis": "y2",
        "text": comments,
        "line": { "shape": "linear", "color": SECONDARY, "width": 3 },
        "marker": { "size": 6, "opacity": 0.8 },
        "hovertemplate": format!("%{{y}}{currency}<br>Comment: %{{text}}"),
      },
    ],
    "layout": layout,
  }))
}

/// Donut chart of total cost per event type.
pub fn category_figure(totals: &CategoryTotals, config: &ServerConfig) -> Option<Value> {
  let sorted = totals.sorted();
  if sorted.iter().all(|(_, total)| *total == 0.0) {
    return None;
  }
  let labels: Vec<&str> = sorted.iter().map(|(et, _)| et.label()).collect();
  let values: Vec<f64> = sorted.iter().map(|(_, total)| round2(*total)).collect();

  Some(json!({
    "data": [{
      "type": "pie",
      "labels": labels,
      "values": values,
      "hole": 0.3,
      "hovertemplate": format!("%{{label}}: %{{value}}{}<extra></extra>", config.currency_symbol),
    }],
    "layout": dark_layout(ChartKind::Categories.title()),
  }))
}

/// Bar per month of average consumption per 100 distance units.
pub fn efficiency_figure(
  monthly: &[MonthlyEfficiency],
  config: &ServerConfig,
) -> Option<Value> {
  if monthly.is_empty() {
    return None;
  }
  let unit = &config.distance_unit;
  let months: Vec<String> = monthly.iter().map(|m| m.month.to_string()).collect();
  let averages: Vec<f64> = monthly.iter().map(|m| m.average).collect();
  let labels: Vec<f64> = averages.iter().copied().map(round2).collect();

  let mut layout = dark_layout(&format!("Average consumption per 100 {unit} by month"));
  layout["xaxis"] = json!({ "title": { "text": "Month" }, "type": "category" });
  layout["yaxis"] = json!({ "title": { "text": format!("Consumption (l/100 {unit})") } });

  Some(json!({
    "data": [{
      "type": "bar",
      "x": months,
      "y": averages,
      "text": labels,
      "textposition": "auto",
      "marker": { "color": PRIMARY },
    }],
    "layout": layout,
  }))
}

// ─── Embedding ───────────────────────────────────────────────────────────────

/// HTML for a chart container plus the script that draws `figure` into it.
pub fn embed(div_id: &str, figure: Option<&Value>) -> String {
  let Some(figure) = figure else {
    return "<p class=\"no-data\">No data available.</p>".to_owned();
  };
  // Figures carry user comments. With `<`, `>` and `&` as JSON escapes the
  // HTML tokenizer sees no markup at all inside the script element.
  let json = script_safe(&figure.to_string());
  let id = escape(div_id);
  format!(
    "<div id=\"{id}\" class=\"chart\"></div>\n\
     <script>(function () {{\n  const fig = {json};\n  \
     Plotly.newPlot(\"{id}\", fig.data, fig.layout, {{ responsive: true }});\n\
     }})();</script>"
  )
}

fn script_safe(json: &str) -> String {
  let mut out = String::with_capacity(json.len());
  for c in json.chars() {
    match c {
      '<' => out.push_str("\\u003c"),
      '>' => out.push_str("\\u003e"),
      '&' => out.push_str("\\u0026"),
      c => out.push(c),
    }
  }
  out
}

fn dark_layout(title: &str) -> Value {
  json!({
    "title": { "text": title },
    "paper_bgcolor": "#111111",
    "plot_bgcolor": "#111111",
    "font": { "color": "#f2f5fa" },
    "legend": { "orientation": "h" },
    "margin": { "t": 60, "r": 60, "b": 50, "l": 60 },
  })
}

fn round2(value: f64) -> f64 { (value * 100.0).round() / 100.0 }

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use fuelbook_core::event::{EventDetails, ExpenseEvent};

  use super::*;

  fn config() -> ServerConfig { ServerConfig::default() }

  fn fuel(id: i64, day: &str, odometer: i64, liters: f64, comment: &str) -> ExpenseEvent {
    ExpenseEvent {
      id,
      date: NaiveDate::parse_from_str(day, "%Y-%m-%d").unwrap(),
      details: EventDetails::Fuel {
        odometer:        Some(odometer),
        liters:          Some(liters),
        price_per_liter: Some(1.5),
      },
      comment: comment.into(),
    }
  }

  #[test]
  fn cost_figure_has_two_traces_on_two_axes() {
    let events = [fuel(1, "2024-01-01", 1000, 10.0, ""), fuel(2, "2024-02-01", 1500, 8.0, "a")];
    let fig = ChartKind::Cost.figure(&events, &config()).unwrap();

    assert_eq!(fig["data"].as_array().unwrap().len(), 2);
    assert_eq!(fig["data"][0]["y"], json!([15.0, 12.0]));
    assert_eq!(fig["data"][1]["y"], json!([15.0, 27.0]));
    assert_eq!(fig["data"][1]["yaxis"], "y2");
    assert_eq!(fig["data"][1]["text"], json!(["–", "a"]));
    assert_eq!(fig["layout"]["yaxis2"]["overlaying"], "y");
  }

  #[test]
  fn efficiency_figure_labels_months() {
    let events = [fuel(1, "2024-01-01", 1000, 10.0, ""), fuel(2, "2024-01-20", 1500, 35.0, "")];
    let fig = ChartKind::Efficiency.figure(&events, &config()).unwrap();

    assert_eq!(fig["data"][0]["type"], "bar");
    assert_eq!(fig["data"][0]["x"], json!(["2024-01"]));
    assert_eq!(fig["data"][0]["text"], json!([7.0]));
  }

  #[test]
  fn empty_reports_have_no_figure() {
    for kind in ChartKind::ALL {
      assert!(kind.figure(&[], &config()).is_none(), "{kind:?}");
    }
    assert!(embed("x", None).contains("No data available."));
  }

  #[test]
  fn embedded_json_cannot_close_the_script() {
    let events = [fuel(1, "2024-01-01", 1000, 10.0, "</script><b>")];
    let fig = ChartKind::Cost.figure(&events, &config());
    let html = embed("chart-cost", fig.as_ref());

    assert_eq!(html.matches("</script>").count(), 1);
    assert!(html.contains("Plotly.newPlot(\"chart-cost\""));
  }

  #[test]
  fn embedded_json_cannot_open_a_comment() {
    let events = [fuel(1, "2024-01-01", 1000, 10.0, "<!--<script> & co")];
    let fig = ChartKind::Cost.figure(&events, &config());
    let html = embed("chart-cost", fig.as_ref());

    assert!(!html.contains("<!--"), "{html}");
    assert_eq!(html.matches("<script>").count(), 1);
    assert!(html.contains("\\u003c!--\\u003cscript\\u003e \\u0026 co"), "{html}");

    // The escapes decode back to the original comment.
    let start = html.find("const fig = ").unwrap() + "const fig = ".len();
    let end = html.find(";\n  Plotly").unwrap();
    let decoded: Value = serde_json::from_str(&html[start..end]).unwrap();
    assert_eq!(decoded["data"][1]["text"][0], "<!--<script> & co");
  }
}
