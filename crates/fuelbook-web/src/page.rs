//! HTML rendering for the ledger pages.
//!
//! Pages are assembled from small string builders. All user-supplied text
//! goes through [`escape`].

use std::{borrow::Cow, collections::BTreeSet, fmt::Write as _};

use chrono::NaiveDate;
use fuelbook_core::{
  event::{EventType, ExpenseEvent},
  report::LedgerSummary,
  vehicle::VehicleName,
};

use crate::{
  ServerConfig,
  chart::{ChartKind, PLOTLY_CDN},
};

const STYLE: &str = "
body { font-family: system-ui, sans-serif; background: #181818; color: #eee;
       margin: 0 auto; max-width: 72rem; padding: 1rem; }
a { color: #6cb6ff; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border-bottom: 1px solid #333; padding: .3rem .5rem; text-align: left; }
td.num { text-align: right; font-variant-numeric: tabular-nums; }
form.inline { display: inline; }
fieldset { border: 1px solid #333; margin: 1rem 0; }
label { display: inline-block; margin: .2rem .6rem .2rem 0; }
input, select, button { background: #222; color: #eee; border: 1px solid #444;
                        padding: .25rem .4rem; }
.chart { min-height: 420px; margin: 1rem 0; }
.no-data { color: #999; font-style: italic; }
.summary span { margin-right: 1.5rem; }
.error { color: #ff7b72; }
";

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape(text: &str) -> Cow<'_, str> { quick_xml::escape::escape(text) }

/// Wrap `body` in the shared document shell.
pub fn layout(title: &str, body: &str) -> String {
  format!(
    "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n\
     <meta charset=\"utf-8\">\n\
     <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
     <title>{title}</title>\n\
     <script src=\"{PLOTLY_CDN}\" charset=\"utf-8\"></script>\n\
     <style>{STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
    title = escape(title),
  )
}

pub fn error_page(status: u16, message: &str) -> String {
  layout(
    "Error",
    &format!(
      "<h1>Error {status}</h1>\n<p class=\"error\">{}</p>\n<p><a href=\"/\">Back to the ledger</a></p>",
      escape(message)
    ),
  )
}

// ─── Ledger page ─────────────────────────────────────────────────────────────

/// Everything the main page shows for the selected vehicle.
pub struct LedgerView<'a> {
  pub vehicle:       &'a VehicleName,
  /// Newest first.
  pub events:        &'a [ExpenseEvent],
  pub last_odometer: Option<i64>,
  pub today:         NaiveDate,
  pub summary:       &'a LedgerSummary,
  /// Embedded chart HTML in [`ChartKind::ALL`] order.
  pub charts:        Vec<String>,
}

/// The main page. Without a selected vehicle only the picker is shown.
pub fn ledger_page(
  vehicles: &BTreeSet<VehicleName>,
  view: Option<&LedgerView<'_>>,
  config: &ServerConfig,
) -> String {
  let mut body = String::from("<h1>Vehicle ledger</h1>\n");
  body.push_str(&vehicle_picker(vehicles, view.map(|v| v.vehicle)));

  let Some(view) = view else {
    body.push_str("<p class=\"no-data\">No vehicles yet. Create one to start recording expenses.</p>\n");
    return layout("Vehicle ledger", &body);
  };
  let vehicle = view.vehicle;

  let _ = writeln!(body, "<h2>{}</h2>", escape(vehicle.as_str()));
  body.push_str(&summary_line(view.summary, config));

  let action = format!("/vehicles/{vehicle}/events");
  let odometer = view.last_odometer.map(|o| o.to_string()).unwrap_or_default();
  body.push_str(&event_form(
    "New entry",
    &action,
    "Add",
    &FormValues {
      event_type: EventType::Fuel,
      date:       view.today.to_string(),
      odometer,
      ..FormValues::default()
    },
  ));

  body.push_str(&events_table(vehicle, view.events, config));

  for (kind, chart) in ChartKind::ALL.iter().zip(&view.charts) {
    let _ = write!(
      body,
      "<h3><a href=\"/vehicles/{vehicle}/charts/{}\">{}</a></h3>\n{chart}\n",
      kind.slug(),
      kind.title(),
    );
  }

  layout(&format!("{vehicle} – Vehicle ledger"), &body)
}

fn vehicle_picker(
  vehicles: &BTreeSet<VehicleName>,
  selected: Option<&VehicleName>,
) -> String {
  let mut html = String::from("<fieldset><legend>Vehicles</legend>\n");

  if !vehicles.is_empty() {
    html.push_str("<form method=\"get\" action=\"/\" class=\"inline\">\n<select name=\"vehicle\">\n");
    for name in vehicles {
      let marker = if Some(name) == selected { " selected" } else { "" };
      let name = escape(name.as_str());
      let _ = writeln!(html, "<option value=\"{name}\"{marker}>{name}</option>");
    }
    html.push_str("</select>\n<button type=\"submit\">Show</button>\n</form>\n");
  }

  html.push_str(
    "<form method=\"post\" action=\"/vehicles\" class=\"inline\">\n\
     <label>New vehicle <input name=\"name\" required maxlength=\"64\" \
     pattern=\"[A-Za-z0-9_\\-][A-Za-z0-9_.\\-]*\"></label>\n\
     <button type=\"submit\">Create</button>\n</form>\n</fieldset>\n",
  );
  html
}

fn summary_line(summary: &LedgerSummary, config: &ServerConfig) -> String {
  let currency = escape(&config.currency_symbol);
  let unit = escape(&config.distance_unit);
  let consumption = summary
    .overall_per_100
    .map(|c| format!("{c:.2} l/100 {unit}"))
    .unwrap_or_else(|| "–".to_owned());
  format!(
    "<p class=\"summary\"><span>{} entries</span><span>Total {:.2} {currency}</span>\
     <span>{:.2} l fuel</span><span>Average {consumption}</span></p>\n",
    summary.event_count, summary.total_cost, summary.total_liters,
  )
}

fn events_table(
  vehicle: &VehicleName,
  events: &[ExpenseEvent],
  config: &ServerConfig,
) -> String {
  if events.is_empty() {
    return "<p class=\"no-data\">No entries recorded.</p>\n".to_owned();
  }

  let mut html = format!(
    "<table>\n<thead><tr><th>Date</th><th>Type</th><th>Odometer ({unit})</th>\
     <th>Liters</th><th>Price/l</th><th>Cost ({currency})</th><th>Comment</th>\
     <th></th></tr></thead>\n<tbody>\n",
    unit = escape(&config.distance_unit),
    currency = escape(&config.currency_symbol),
  );

  for event in events {
    let id = event.id;
    let _ = writeln!(
      html,
      "<tr><td>{}</td><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td>\
       <td class=\"num\">{}</td><td class=\"num\">{}</td><td>{}</td>\
       <td><a href=\"/vehicles/{vehicle}/events/{id}/edit\">Edit</a> \
       <form method=\"post\" action=\"/vehicles/{vehicle}/events/{id}/delete\" class=\"inline\" \
       onsubmit=\"return confirm('Delete this entry?');\">\
       <button type=\"submit\">Delete</button></form></td></tr>",
      event.date,
      event.event_type().label(),
      opt(event.odometer(), |o| o.to_string()),
      opt(event.liters(), |l| format!("{l:.2}")),
      opt(event.price_per_liter(), |p| format!("{p:.3}")),
      opt(event.cost(), |c| format!("{c:.2}")),
      escape(&event.comment),
    );
  }

  html.push_str("</tbody>\n</table>\n");
  html
}

fn opt<T>(value: Option<T>, fmt: impl FnOnce(T) -> String) -> String {
  value.map(fmt).unwrap_or_default()
}

// ─── Entry form ──────────────────────────────────────────────────────────────

/// Prefilled values for the entry form, already formatted as text.
#[derive(Debug, Clone)]
pub struct FormValues {
  pub event_type:      EventType,
  pub date:            String,
  pub odometer:        String,
  pub liters:          String,
  pub price_per_liter: String,
  pub cost:            String,
  pub comment:         String,
}

impl Default for FormValues {
  fn default() -> Self {
    Self {
      event_type:      EventType::Fuel,
      date:            String::new(),
      odometer:        String::new(),
      liters:          String::new(),
      price_per_liter: String::new(),
      cost:            String::new(),
      comment:         String::new(),
    }
  }
}

impl From<&ExpenseEvent> for FormValues {
  fn from(event: &ExpenseEvent) -> Self {
    let text = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
    Self {
      event_type:      event.event_type(),
      date:            event.date.to_string(),
      odometer:        event.odometer().map(|o| o.to_string()).unwrap_or_default(),
      liters:          text(event.liters()),
      price_per_liter: text(event.price_per_liter()),
      // Fuel cost is derived; the field is only meaningful for other types.
      cost:            match event.event_type() {
        EventType::Fuel => String::new(),
        _ => text(event.cost()),
      },
      comment:         event.comment.clone(),
    }
  }
}

/// Single form for every event type. Fields that do not apply to the chosen
/// type are ignored on submission.
pub fn event_form(legend: &str, action: &str, submit: &str, values: &FormValues) -> String {
  let mut options = String::new();
  for et in EventType::ALL {
    let marker = if et == values.event_type { " selected" } else { "" };
    let _ = write!(options, "<option value=\"{}\"{marker}>{}</option>", et.as_str(), et.label());
  }

  format!(
    "<form method=\"post\" action=\"{action}\">\n<fieldset><legend>{legend}</legend>\n\
     <label>Type <select name=\"event_type\">{options}</select></label>\n\
     <label>Date <input type=\"date\" name=\"date\" value=\"{date}\" required></label>\n\
     <label>Odometer <input type=\"number\" name=\"odometer\" min=\"0\" step=\"1\" value=\"{odometer}\"></label>\n\
     <label>Liters <input type=\"number\" name=\"liters\" min=\"0\" step=\"0.01\" value=\"{liters}\"></label>\n\
     <label>Price/l <input type=\"number\" name=\"price_per_liter\" min=\"0\" step=\"0.001\" value=\"{price}\"></label>\n\
     <label>Cost <input type=\"number\" name=\"cost\" step=\"0.01\" value=\"{cost}\"></label>\n\
     <label>Comment <input type=\"text\" name=\"comment\" value=\"{comment}\"></label>\n\
     <button type=\"submit\">{submit}</button>\n</fieldset>\n</form>\n",
    action = escape(action),
    legend = escape(legend),
    date = escape(&values.date),
    odometer = escape(&values.odometer),
    liters = escape(&values.liters),
    price = escape(&values.price_per_liter),
    cost = escape(&values.cost),
    comment = escape(&values.comment),
    submit = escape(submit),
  )
}

pub fn edit_page(vehicle: &VehicleName, event: &ExpenseEvent) -> String {
  let action = format!("/vehicles/{vehicle}/events/{}", event.id);
  let body = format!(
    "<h1>Edit entry</h1>\n{}<p><a href=\"/?vehicle={vehicle}\">Back to {}</a></p>\n",
    event_form(
      &format!("Entry #{} of {vehicle}", event.id),
      &action,
      "Save",
      &FormValues::from(event),
    ),
    escape(vehicle.as_str()),
  );
  layout(&format!("Edit entry – {vehicle}"), &body)
}

pub fn chart_page(vehicle: &VehicleName, kind: ChartKind, chart: &str) -> String {
  let body = format!(
    "<h1>{} – {}</h1>\n{chart}\n<p><a href=\"/?vehicle={vehicle}\">Back to the ledger</a></p>\n",
    escape(vehicle.as_str()),
    kind.title(),
  );
  layout(&format!("{} – {vehicle}", kind.title()), &body)
}
