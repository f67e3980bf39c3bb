//! JSON REST API for Ward.
//!
//! Exposes an axum [`Router`] backed by any [`ward_core::store::IncidentStore`].
//! TLS, CORS and request tracing are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = ward_api::api_router(Arc::new(store));
//! ```

pub mod auth;
pub mod error;
pub mod incidents;
pub mod init;
pub mod statuses;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use ward_core::store::IncidentStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: IncidentStore + 'static,
{
  Router::new()
    .route("/initialize", post(init::handler::<S>))
    // Auth
    .route("/register", post(auth::register::<S>))
    .route("/login", post(auth::login::<S>))
    // Statuses
    .route("/statuses", get(statuses::list::<S>).post(statuses::create::<S>))
    .route(
      "/statuses/{id}",
      get(statuses::get_one::<S>)
        .put(statuses::rename::<S>)
        .delete(statuses::delete_one::<S>),
    )
    // Incidents
    .route("/incidents", get(incidents::list::<S>).post(incidents::create::<S>))
    .route(
      "/incidents/{id}",
      get(incidents::get_one::<S>).delete(incidents::delete_one::<S>),
    )
    .route(
      "/incidents/{id}/updates",
      get(incidents::list_updates::<S>).post(incidents::add_update::<S>),
    )
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use ward_store_sqlite::SqliteStore;

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let app   = api_router(Arc::new(store));
    let resp  = send(&app, "POST", "/initialize", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    app
  }

  async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
      Some(b) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(b.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(req).await.unwrap()
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  async fn register(app: &Router, user_id: &str, password: &str) -> Response {
    send(
      app,
      "POST",
      "/register",
      Some(json!({ "userId": user_id, "username": "Alice", "password": password })),
    )
    .await
  }

  /// Register `user_id` and require success.
  async fn signup(app: &Router, user_id: &str, password: &str) {
    let resp = register(app, user_id, password).await;
    assert_eq!(resp.status(), StatusCode::CREATED, "registering {user_id}");
  }

  async fn create_incident(app: &Router, subject: &str) -> Value {
    let resp = send(
      app,
      "POST",
      "/incidents",
      Some(json!({
        "userId": "alice",
        "subject": subject,
        "occurrenceDate": "2024-06-30",
        "content": "Credential stuffing against VPN",
        "threatType": "intrusion",
        "statusId": 1,
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp).await;
    assert_eq!(body["success"], true);
    body["incident"].clone()
  }

  // ── Initialize ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn initialize_twice_keeps_three_statuses() {
    let app  = app().await;
    let resp = send(&app, "POST", "/initialize", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["success"], true);

    let statuses = json_body(send(&app, "GET", "/statuses", None).await).await;
    assert_eq!(statuses.as_array().unwrap().len(), 3);
    assert_eq!(statuses[0]["name"], "Open");
  }

  // ── Auth ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn register_hides_hash_and_rejects_duplicates() {
    let app  = app().await;
    let resp = register(&app, "alice", "s3cret").await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["userId"], "alice");
    assert!(body["user"].get("passwordHash").is_none());
    assert!(!body.to_string().contains("argon2"));

    let resp = register(&app, "alice", "other").await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = json_body(resp).await;
    assert_eq!(body["success"], false);
  }

  #[tokio::test]
  async fn login_checks_password() {
    let app = app().await;
    signup(&app, "alice", "s3cret").await;

    let ok = send(&app, "POST", "/login", Some(json!({ "userId": "alice", "password": "s3cret" }))).await;
    assert_eq!(ok.status(), StatusCode::OK);
    let body = json_body(ok).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["username"], "Alice");
    assert!(body["user"].get("passwordHash").is_none());

    let bad = send(&app, "POST", "/login", Some(json!({ "userId": "alice", "password": "nope" }))).await;
    assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(bad).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
  }

  #[tokio::test]
  async fn login_unknown_user_is_401() {
    let app  = app().await;
    let resp = send(&app, "POST", "/login", Some(json!({ "userId": "ghost", "password": "x" }))).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  // ── Statuses ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn status_crud() {
    let app  = app().await;
    let resp = send(&app, "POST", "/statuses", Some(json!({ "name": "Escalated" }))).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let id = json_body(resp).await["status"]["id"].as_i64().unwrap();

    let resp = send(&app, "PUT", &format!("/statuses/{id}"), Some(json!({ "name": "Triaged" }))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["status"]["name"], "Triaged");

    let resp = send(&app, "GET", &format!("/statuses/{id}"), None).await;
    assert_eq!(json_body(resp).await["name"], "Triaged");

    let resp = send(&app, "DELETE", &format!("/statuses/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!({ "success": true }));

    let resp = send(&app, "GET", &format!("/statuses/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn duplicate_status_name_is_500() {
    let app  = app().await;
    let resp = send(&app, "POST", "/statuses", Some(json!({ "name": "Closed" }))).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(resp).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("UNIQUE"));
  }

  #[tokio::test]
  async fn deleting_status_in_use_fails() {
    let app = app().await;
    signup(&app, "alice", "pw").await;
    create_incident(&app, "Phishing").await;

    let resp = send(&app, "DELETE", "/statuses/1", None).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(resp).await["success"], false);
  }

  // ── Incidents ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_then_fetch_incident() {
    let app = app().await;
    signup(&app, "alice", "pw").await;
    let incident = create_incident(&app, "VPN brute force").await;
    assert_eq!(incident["statusName"], "Open");

    let id   = incident["id"].as_i64().unwrap();
    let resp = send(&app, "GET", &format!("/incidents/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["subject"], "VPN brute force");
    assert_eq!(body["occurrenceDate"], "2024-06-30");
    assert_eq!(body["threatType"], "intrusion");
    assert_eq!(body["userId"], "alice");
    assert_eq!(body["statusId"], 1);
    assert_eq!(body["updates"], json!([]));
  }

  #[tokio::test]
  async fn missing_incident_is_404() {
    let app  = app().await;
    let resp = send(&app, "GET", "/incidents/12345", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(resp).await["success"], false);

    let resp = send(&app, "DELETE", "/incidents/12345", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn updates_are_returned_in_order_and_cascade() {
    let app = app().await;
    signup(&app, "alice", "pw").await;
    let id = create_incident(&app, "Malware on host").await["id"].as_i64().unwrap();

    for note in ["Host isolated", "Reimaged"] {
      let resp = send(
        &app,
        "POST",
        &format!("/incidents/{id}/updates"),
        Some(json!({ "updateContent": note })),
      )
      .await;
      assert_eq!(resp.status(), StatusCode::CREATED);
      assert_eq!(json_body(resp).await["update"]["incidentId"], id);
    }

    let body = json_body(send(&app, "GET", &format!("/incidents/{id}"), None).await).await;
    let notes: Vec<&str> = body["updates"]
      .as_array()
      .unwrap()
      .iter()
      .map(|u| u["updateContent"].as_str().unwrap())
      .collect();
    assert_eq!(notes, ["Host isolated", "Reimaged"]);

    let resp = send(&app, "DELETE", &format!("/incidents/{id}"), None).await;
    assert_eq!(json_body(resp).await, json!({ "success": true }));

    let updates = json_body(send(&app, "GET", &format!("/incidents/{id}/updates"), None).await).await;
    assert_eq!(updates, json!([]));
  }

  #[tokio::test]
  async fn update_on_missing_incident_is_500() {
    let app  = app().await;
    let resp = send(&app, "POST", "/incidents/99/updates", Some(json!({ "updateContent": "?" }))).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  }

  fn subjects(list: &Value) -> Vec<&str> {
    list
      .as_array()
      .unwrap()
      .iter()
      .map(|i| i["subject"].as_str().unwrap())
      .collect()
  }

  #[tokio::test]
  async fn list_filters_by_subject_newest_first() {
    let app = app().await;
    signup(&app, "alice", "pw").await;
    create_incident(&app, "Phishing wave").await;
    create_incident(&app, "Whaling / PHISHING").await;
    create_incident(&app, "Tailgating").await;

    let all = json_body(send(&app, "GET", "/incidents", None).await).await;
    assert_eq!(subjects(&all), ["Tailgating", "Whaling / PHISHING", "Phishing wave"]);

    let hits = json_body(send(&app, "GET", "/incidents?subject=phish", None).await).await;
    assert_eq!(subjects(&hits), ["Whaling / PHISHING", "Phishing wave"]);
  }

  #[tokio::test]
  async fn list_filter_ignores_non_ascii_case() {
    let app = app().await;
    signup(&app, "alice", "pw").await;
    create_incident(&app, "ÉCHEC de connexion").await;
    create_incident(&app, "Доступ ЗАПРЕЩЁН").await;

    // "échec"
    let hits = json_body(send(&app, "GET", "/incidents?subject=%C3%A9chec", None).await).await;
    assert_eq!(subjects(&hits), ["ÉCHEC de connexion"]);

    // "запрещён"
    let uri = "/incidents?subject=%D0%B7%D0%B0%D0%BF%D1%80%D0%B5%D1%89%D1%91%D0%BD";
    let hits = json_body(send(&app, "GET", uri, None).await).await;
    assert_eq!(subjects(&hits), ["Доступ ЗАПРЕЩЁН"]);
  }

  #[tokio::test]
  async fn incident_for_unknown_user_fails() {
    let app  = app().await;
    let resp = send(
      &app,
      "POST",
      "/incidents",
      Some(json!({
        "userId": "nobody",
        "subject": "x",
        "occurrenceDate": "2024-01-01",
        "content": "x",
        "threatType": "x",
        "statusId": 1,
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  }
}
