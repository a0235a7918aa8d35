//! JSON REST API for famtree.
//!
//! Exposes an axum [`Router`] backed by any [`famtree_core::store::FamilyStore`].
//! Every mutation goes through [`famtree_core::editor`], so the HTTP surface
//! enforces the same rules as the CLI.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", famtree_api::api_router(store.clone(), "Salian Family"))
//! ```

pub mod error;
pub mod exchange;
pub mod people;
pub mod tree;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use famtree_core::store::FamilyStore;

pub use error::ApiError;

/// State shared by every handler.
pub struct ApiState<S> {
  pub store:       Arc<S>,
  /// Label for the virtual root when the record has several roots.
  pub family_name: String,
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, family_name: impl Into<String>) -> Router<()>
where
  S: FamilyStore + 'static,
{
  let state = Arc::new(ApiState {
    store,
    family_name: family_name.into(),
  });

  Router::new()
    // People
    .route("/people", get(people::list::<S>).post(people::create::<S>))
    .route("/people/reorder", post(people::reorder::<S>))
    .route(
      "/people/{id}",
      get(people::get_one::<S>)
        .put(people::update::<S>)
        .delete(people::delete::<S>),
    )
    .route("/people/{id}/children", post(people::add_child::<S>))
    .route("/people/{id}/parent", post(people::add_parent::<S>))
    // Views
    .route("/tree", get(tree::handler::<S>))
    // Exchange
    .route("/export", get(exchange::export::<S>))
    .route("/import", post(exchange::import::<S>))
    .with_state(state)
}

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use famtree_core::{PersonId, sample::sample_family};
  use famtree_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::*;

  async fn seeded() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    store.replace_all(sample_family()).await.unwrap();
    api_router(Arc::new(store), "Salian Family")
  }

  async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(req).await.unwrap()
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  // ── People ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn list_and_search_people() {
    let app = seeded().await;

    let resp = send(&app, "GET", "/people", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await.as_array().unwrap().len(), 6);

    let resp = send(&app, "GET", "/people?q=goa", None).await;
    let names: Vec<String> = json_body(resp)
      .await
      .as_array()
      .unwrap()
      .iter()
      .map(|p| p["name"].as_str().unwrap().to_owned())
      .collect();
    assert_eq!(
      names,
      ["Maria Salian", "Anna Salian", "Catherine Salian", "Elena Salian"]
    );
  }

  #[tokio::test]
  async fn get_one_found_and_missing() {
    let app = seeded().await;

    let resp = send(&app, "GET", "/people/2", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["name"], "Anna Salian");
    assert_eq!(body["parentId"], 1);

    let resp = send(&app, "GET", "/people/99", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(json_body(resp).await["error"].is_string());
  }

  #[tokio::test]
  async fn create_validates_and_computes_lineage() {
    let app = seeded().await;

    let resp = send(
      &app,
      "POST",
      "/people",
      Some(json!({"name": "Iris", "gender": "female", "parentId": 6})),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp).await;
    assert_eq!(body["isMainLineage"], true);
    assert!(body["id"].is_string());

    let resp = send(&app, "POST", "/people", Some(json!({"name": " "}))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = send(
      &app,
      "POST",
      "/people",
      Some(json!({"name": "Ghost child", "parentId": 404})),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn add_child_uses_the_path_parent() {
    let app = seeded().await;

    let resp = send(
      &app,
      "POST",
      "/people/3/children",
      Some(json!({"name": "Rita", "gender": "female"})),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp).await;
    assert_eq!(body["parentId"], 3);
    assert_eq!(body["isMainLineage"], false);
  }

  #[tokio::test]
  async fn add_parent_returns_both_halves() {
    let app = seeded().await;

    let resp = send(
      &app,
      "POST",
      "/people/1/parent",
      Some(json!({"name": "Rosa Salian", "gender": "female"})),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp).await;
    assert_eq!(body["child"]["parentId"], body["parent"]["id"]);
    assert_eq!(body["parent"]["parentId"], Value::Null);

    let resp = send(
      &app,
      "POST",
      "/people/1/parent",
      Some(json!({"name": "Another", "gender": "male"})),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
  }

  #[tokio::test]
  async fn update_checks_path_and_cycles() {
    let app = seeded().await;
    let mut maria = serde_json::to_value(&sample_family()[0]).unwrap();

    let resp = send(&app, "PUT", "/people/2", Some(maria.clone())).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    maria["parentId"] = json!(6);
    let resp = send(&app, "PUT", "/people/1", Some(maria.clone())).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    maria["parentId"] = Value::Null;
    maria["nickname"] = json!("Nani");
    let resp = send(&app, "PUT", "/people/1", Some(maria)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["nickname"], "Nani");
  }

  #[tokio::test]
  async fn delete_refuses_parents_and_removes_leaves() {
    let app = seeded().await;

    let resp = send(&app, "DELETE", "/people/4", None).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let msg = json_body(resp).await["error"].as_str().unwrap().to_owned();
    assert!(msg.contains("Elena Salian"), "{msg}");

    let resp = send(&app, "DELETE", "/people/6", None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = send(&app, "GET", "/people/6", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn reorder_siblings_and_reject_strangers() {
    let app = seeded().await;

    let resp = send(&app, "POST", "/people/reorder", Some(json!({"ids": [5, 4]}))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body[0]["id"], 5);
    assert_eq!(body[0]["siblingOrder"], 0);

    let resp = send(&app, "POST", "/people/reorder", Some(json!({"ids": [2, 4]}))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── Tree ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn tree_nests_children_and_is_null_when_empty() {
    let app = seeded().await;

    let resp = send(&app, "GET", "/tree", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let tree = json_body(resp).await;
    assert_eq!(tree["name"], "Maria Salian");
    assert_eq!(tree["children"][0]["name"], "Anna Salian");
    assert_eq!(tree["children"][0]["children"].as_array().unwrap().len(), 2);

    let resp = send(&app, "GET", "/tree?q=nobody", None).await;
    assert_eq!(json_body(resp).await, Value::Null);
  }

  #[tokio::test]
  async fn several_roots_hang_under_the_family_name() {
    let app = seeded().await;
    send(&app, "POST", "/people", Some(json!({"name": "Stranger", "gender": "male"}))).await;

    let tree = json_body(send(&app, "GET", "/tree", None).await).await;

    assert_eq!(tree["id"], "virtual-root");
    assert_eq!(tree["name"], "Salian Family");
    assert_eq!(tree["isVirtual"], true);
    assert_eq!(tree["children"].as_array().unwrap().len(), 2);
  }

  // ── Exchange ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn export_then_import_round_trips() {
    let app = seeded().await;

    let resp = send(&app, "GET", "/export", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");
    let exported = json_body(resp).await;

    let fresh = api_router(
      Arc::new(SqliteStore::open_in_memory().await.unwrap()),
      "Family",
    );
    let resp = send(&fresh, "POST", "/import", Some(exported.clone())).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let report = json_body(resp).await;
    assert_eq!(report["imported"], 6);
    assert_eq!(report["warnings"], json!([]));

    let again = json_body(send(&fresh, "GET", "/export", None).await).await;
    assert_eq!(again, exported);
  }

  #[tokio::test]
  async fn import_reports_skipped_records() {
    let app = seeded().await;

    let resp = send(
      &app,
      "POST",
      "/import",
      Some(json!([
        {"id": 1, "name": "Kept", "gender": "female"},
        {"id": 2, "name": "Backwards", "gender": "male", "birthYear": 2000, "deathYear": 1990}
      ])),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let report = json_body(resp).await;
    assert_eq!(report["imported"], 1);
    assert_eq!(report["warnings"][0]["index"], 1);
    assert_eq!(report["warnings"][0]["issue"]["kind"], "invalid_lifespan");

    let resp = send(&app, "GET", &format!("/people/{}", PersonId::Int(2)), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = send(&app, "POST", "/import", Some(json!({"not": "an array"}))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }
}
