//! JSON API for the vehicle ledger.
//!
//! Exposes an axum [`Router`] backed by any [`LedgerStore`]. Mounted by
//! [`crate::router`] with
//!
//! ```rust,ignore
//! .nest("/api", api::api_router(store.clone()))
//! ```

pub mod error;
pub mod events;
pub mod extract;
pub mod reports;
pub mod vehicles;

use std::sync::Arc;

use axum::{Router, routing::get};
use fuelbook_core::store::LedgerStore;

pub use error::ApiError;

/// API routes bound to `store`. The state is already applied, so the result
/// nests under a parent router of any state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: LedgerStore + 'static,
{
  Router::new()
    // Vehicles
    .route("/vehicles", get(vehicles::list::<S>).post(vehicles::create::<S>))
    // Events
    .route(
      "/vehicles/{vehicle}/events",
      get(events::list::<S>).post(events::create::<S>),
    )
    .route(
      "/vehicles/{vehicle}/events/{id}",
      get(events::get_one::<S>)
        .put(events::update::<S>)
        .delete(events::delete::<S>),
    )
    // Reports
    .route("/vehicles/{vehicle}/reports/{report}", get(reports::handler::<S>))
    .with_state(store)
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use fuelbook_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tempfile::TempDir;
  use tower::ServiceExt as _;

  async fn make_store() -> (Arc<SqliteStore>, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::open(dir.path()).await.unwrap();
    (Arc::new(store), dir)
  }

  async fn call(
    store:  &Arc<SqliteStore>,
    method: &str,
    uri:    &str,
    body:   Option<Value>,
  ) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(json) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(json.to_string())
      }
      None => Body::empty(),
    };
    api_router(store.clone()).oneshot(builder.body(body).unwrap()).await.unwrap()
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  async fn with_golf() -> (Arc<SqliteStore>, TempDir) {
    let (store, dir) = make_store().await;
    let resp = call(&store, "POST", "/vehicles", Some(json!({ "name": "golf" }))).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    (store, dir)
  }

  // ── Vehicles ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_vehicle_twice_returns_200_second_time() {
    let (store, _dir) = with_golf().await;
    let resp = call(&store, "POST", "/vehicles", Some(json!({ "name": "golf" }))).await;
    assert_eq!(resp.status(), StatusCode::OK);

    call(&store, "POST", "/vehicles", Some(json!({ "name": "astra" }))).await;
    let resp = call(&store, "GET", "/vehicles", None).await;
    assert_eq!(json_body(resp).await, json!(["astra", "golf"]));
  }

  #[tokio::test]
  async fn invalid_vehicle_name_is_400_with_json_error() {
    let (store, _dir) = make_store().await;
    let resp = call(&store, "POST", "/vehicles", Some(json!({ "name": "a/b" }))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].as_str().unwrap().contains("a/b"));
  }

  // ── Events ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_accepts_numbers_or_strings() {
    let (store, _dir) = with_golf().await;
    let resp = call(
      &store,
      "POST",
      "/vehicles/golf/events",
      Some(json!({
        "event_type": "fuel",
        "date": "2024-01-01",
        "odometer": 1000,
        "liters": "10",
        "price_per_liter": 1.5,
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let event = json_body(resp).await;
    assert_eq!(event["event_type"], "fuel");
    assert_eq!(event["odometer"], 1000);
    assert_eq!(event["cost"], 15.0);
    assert_eq!(event["comment"], "");
  }

  #[tokio::test]
  async fn list_respects_order() {
    let (store, _dir) = with_golf().await;
    for day in ["2024-02-01", "2024-01-01", "2024-03-01"] {
      call(
        &store,
        "POST",
        "/vehicles/golf/events",
        Some(json!({ "event_type": "other", "date": day, "cost": 1 })),
      )
      .await;
    }

    let dates = |v: Value| -> Vec<String> {
      v.as_array()
        .unwrap()
        .iter()
        .map(|e| e["date"].as_str().unwrap().to_owned())
        .collect()
    };

    let resp = call(&store, "GET", "/vehicles/golf/events?order=asc", None).await;
    assert_eq!(dates(json_body(resp).await), ["2024-01-01", "2024-02-01", "2024-03-01"]);

    let resp = call(&store, "GET", "/vehicles/golf/events", None).await;
    assert_eq!(dates(json_body(resp).await), ["2024-03-01", "2024-02-01", "2024-01-01"]);
  }

  #[tokio::test]
  async fn put_replaces_and_delete_removes() {
    let (store, _dir) = with_golf().await;
    let resp = call(
      &store,
      "POST",
      "/vehicles/golf/events",
      Some(json!({ "event_type": "maintenance", "date": "2024-01-01", "cost": 99.5 })),
    )
    .await;
    let id = json_body(resp).await["id"].as_i64().unwrap();
    let uri = format!("/vehicles/golf/events/{id}");

    let resp = call(
      &store,
      "PUT",
      &uri,
      Some(json!({ "event_type": "other", "date": "2024-01-05", "cost": -10, "comment": "refund" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let event = json_body(resp).await;
    assert_eq!(event["cost"], -10.0);
    assert_eq!(event["odometer"], Value::Null);

    let resp = call(&store, "DELETE", &uri, None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let resp = call(&store, "GET", &uri, None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = call(&store, "DELETE", &uri, None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn invalid_event_is_400() {
    let (store, _dir) = with_golf().await;
    let resp = call(
      &store,
      "POST",
      "/vehicles/golf/events",
      Some(json!({ "event_type": "fuel", "date": "01.02.2024" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = call(&store, "GET", "/vehicles/golf/events", None).await;
    assert_eq!(json_body(resp).await, json!([]));
  }

  #[tokio::test]
  async fn unknown_vehicle_is_404() {
    let (store, _dir) = make_store().await;
    let resp = call(&store, "GET", "/vehicles/ghost/events", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(json_body(resp).await["error"].is_string());
  }

  #[tokio::test]
  async fn malformed_json_body_is_400_with_json_error() {
    let (store, _dir) = with_golf().await;
    let request = Request::builder()
      .method("POST")
      .uri("/vehicles/golf/events")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from("{\"event_type\": \"fuel\","))
      .unwrap();
    let resp = api_router(store.clone()).oneshot(request).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");
    assert!(json_body(resp).await["error"].is_string());
  }

  #[tokio::test]
  async fn missing_content_type_is_415_with_json_error() {
    let (store, _dir) = with_golf().await;
    let request = Request::builder()
      .method("POST")
      .uri("/vehicles")
      .body(Body::from(r#"{"name":"astra"}"#))
      .unwrap();
    let resp = api_router(store.clone()).oneshot(request).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(json_body(resp).await["error"].is_string());
  }

  #[tokio::test]
  async fn non_numeric_event_id_is_json_error() {
    let (store, _dir) = with_golf().await;
    let resp = call(&store, "GET", "/vehicles/golf/events/abc", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].is_string());
  }

  #[tokio::test]
  async fn bad_order_parameter_is_json_error() {
    let (store, _dir) = with_golf().await;
    let resp = call(&store, "GET", "/vehicles/golf/events?order=sideways", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].is_string());
  }

  // ── Reports ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn reports_aggregate_the_ledger() {
    let (store, _dir) = with_golf().await;
    for (date, odometer, liters) in [("2024-01-01", 1000, 40), ("2024-01-20", 1500, 35)] {
      call(
        &store,
        "POST",
        "/vehicles/golf/events",
        Some(json!({
          "event_type": "fuel",
          "date": date,
          "odometer": odometer,
          "liters": liters,
          "price_per_liter": 2,
        })),
      )
      .await;
    }
    call(
      &store,
      "POST",
      "/vehicles/golf/events",
      Some(json!({ "event_type": "maintenance", "date": "2024-01-10", "cost": 50 })),
    )
    .await;

    let cost = json_body(call(&store, "GET", "/vehicles/golf/reports/cost", None).await).await;
    assert_eq!(cost["status"], "points");
    assert_eq!(cost["points"][1]["cumulative"], 150.0);

    let categories =
      json_body(call(&store, "GET", "/vehicles/golf/reports/categories", None).await).await;
    assert_eq!(categories["fuel"], 150.0);
    assert_eq!(categories["maintenance"], 50.0);

    let efficiency =
      json_body(call(&store, "GET", "/vehicles/golf/reports/efficiency", None).await).await;
    assert_eq!(efficiency[0]["month"], "2024-01");
    assert!((efficiency[0]["average"].as_f64().unwrap() - 7.0).abs() < 1e-9);

    let summary =
      json_body(call(&store, "GET", "/vehicles/golf/reports/summary", None).await).await;
    assert_eq!(summary["event_count"], 3);
    assert_eq!(summary["total_cost"], 200.0);
  }

  #[tokio::test]
  async fn unknown_report_is_json_error() {
    let (store, _dir) = with_golf().await;
    let resp = call(&store, "GET", "/vehicles/golf/reports/speed", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].is_string());
  }

  #[tokio::test]
  async fn empty_cost_report_has_no_data() {
    let (store, _dir) = with_golf().await;
    let cost = json_body(call(&store, "GET", "/vehicles/golf/reports/cost", None).await).await;
    assert_eq!(cost, json!({ "status": "no_data" }));
  }
}
