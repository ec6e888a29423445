//! Router-level tests against an in-memory store and a scripted enricher.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use cellar_core::enrich::{Enrichment, ExpertNotesReport, Selection};
use cellar_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use super::*;

// ─── Fixtures ────────────────────────────────────────────────────────────────

/// Answers every request the same way; `fail` turns every call into an error.
#[derive(Default)]
struct StubEnricher {
  description: String,
  notes:       Vec<String>,
  fail:        bool,
}

impl StubEnricher {
  fn check(&self) -> Result<(), std::io::Error> {
    if self.fail {
      Err(std::io::Error::other("model unavailable"))
    } else {
      Ok(())
    }
  }
}

impl Enrichment for StubEnricher {
  type Error = std::io::Error;

  async fn describe(&self, _bottle_query: &str) -> Result<String, Self::Error> {
    self.check()?;
    Ok(self.description.clone())
  }

  async fn expert_notes(
    &self,
    bottle_query: &str,
    vocabulary: &[String],
  ) -> Result<ExpertNotesReport, Self::Error> {
    self.check()?;
    let notes: Vec<String> = self
      .notes
      .iter()
      .filter(|n| vocabulary.contains(n))
      .cloned()
      .collect();
    Ok(ExpertNotesReport {
      bottle:      bottle_query.to_string(),
      source_url:  Some("https://brand.example".into()),
      selection:   Selection::default(),
      evidence:    notes.iter().map(|n| (n.clone(), String::new())).collect::<BTreeMap<_, _>>(),
      notes,
      failed_urls: vec![],
    })
  }
}

fn photo_dir(name: &str) -> std::path::PathBuf {
  std::env::temp_dir().join(format!("cellar-api-{name}-{}", std::process::id()))
}

async fn app_with_photos(enricher: StubEnricher, dir: std::path::PathBuf) -> Router {
  let store = SqliteStore::open_in_memory().await.unwrap();
  api_router(ApiState::new(Arc::new(store), Arc::new(enricher), PhotoStore::new(dir)))
}

async fn app(enricher: StubEnricher) -> Router {
  app_with_photos(enricher, photo_dir("tests")).await
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
  let builder = Request::builder().method(method).uri(uri);
  let req = match body {
    Some(b) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(b.to_string())),
    None => builder.body(Body::empty()),
  }
  .unwrap();

  let resp = app.clone().oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
  (status, value)
}

async fn add_bottle(app: &Router, brand: &str, name: &str, kind: &str) -> i64 {
  let (status, body) = send(
    app,
    "POST",
    "/bottles",
    Some(json!({ "brand": brand, "name": name, "abv": "46", "spirit_type": kind })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  body["id"].as_i64().unwrap()
}

async fn add_user(app: &Router, name: &str) -> i64 {
  let (status, body) = send(app, "POST", "/users", Some(json!({ "name": name }))).await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  body["id"].as_i64().unwrap()
}

// ─── Bottles ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_fetch_bottle() {
  let app = app(StubEnricher::default()).await;
  let id = add_bottle(&app, "Ardbeg", "Ten", "Scotch").await;

  let (status, body) = send(&app, "GET", &format!("/bottles/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["brand"], "Ardbeg");
  assert_eq!(body["available"], true);
  assert_eq!(body["reviews"], json!([]));
}

#[tokio::test]
async fn missing_bottle_is_404_json() {
  let app = app(StubEnricher::default()).await;
  let (status, body) = send(&app, "GET", "/bottles/99", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].as_str().unwrap().contains("99"));
}

#[tokio::test]
async fn malformed_bodies_are_400() {
  let app = app(StubEnricher::default()).await;
  let (status, body) = send(&app, "POST", "/bottles", Some(json!({ "brand": "Ardbeg" }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());

  let (status, _) = send(
    &app,
    "POST",
    "/bottles",
    Some(json!({ "brand": " ", "name": "Ten", "abv": "46", "spirit_type": "Scotch" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_filters_by_type_and_sorts() {
  let app = app(StubEnricher::default()).await;
  add_bottle(&app, "Ardbeg", "Ten", "Scotch").await;
  add_bottle(&app, "Lagavulin", "16", "Scotch").await;
  add_bottle(&app, "Wild Turkey", "101", "Bourbon").await;

  let (status, body) =
    send(&app, "GET", "/bottles?type=Scotch&sort_by=brand&order=DESC", None).await;
  assert_eq!(status, StatusCode::OK);
  let brands: Vec<&str> = body.as_array().unwrap().iter().map(|b| b["brand"].as_str().unwrap()).collect();
  assert_eq!(brands, ["Lagavulin", "Ardbeg"]);

  let (status, _) = send(&app, "GET", "/bottles?sort_by=price;DROP", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn patch_updates_and_random_skips_unavailable() {
  let app = app(StubEnricher::default()).await;
  let (status, _) = send(&app, "GET", "/bottles/random", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let id = add_bottle(&app, "Ardbeg", "Ten", "Scotch").await;
  let (status, body) = send(&app, "GET", "/bottles/random", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["id"], id);

  let (status, body) =
    send(&app, "PATCH", &format!("/bottles/{id}"), Some(json!({ "available": false }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["available"], false);

  let (status, _) = send(&app, "GET", "/bottles/random", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, _) = send(&app, "PATCH", "/bottles/404", Some(json!({ "name": "x" }))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  let (status, _) = send(&app, "PATCH", &format!("/bottles/{id}"), Some(json!({}))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bottle_photo_is_saved() {
  let app = app(StubEnricher::default()).await;
  let (status, body) = send(
    &app,
    "POST",
    "/bottles",
    Some(json!({
      "brand": "Ardbeg", "name": "Ten", "abv": "46", "spirit_type": "Scotch",
      "photo": "data:image/png;base64,aGVsbG8="
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);

  let (_, bottle) = send(&app, "GET", &format!("/bottles/{}", body["id"]), None).await;
  let path = bottle["image_path"].as_str().unwrap();
  assert!(path.starts_with("bottles/") && path.ends_with(".png"), "{path}");

  let (status, _) = send(
    &app,
    "POST",
    "/users",
    Some(json!({ "name": "ann", "photo": "not base64!" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn photo_for_missing_bottle_is_not_written() {
  let dir = photo_dir("orphan");
  let _ = std::fs::remove_dir_all(&dir);
  let app = app_with_photos(StubEnricher::default(), dir.clone()).await;

  let (status, body) = send(
    &app,
    "PATCH",
    "/bottles/404",
    Some(json!({ "photo": "data:image/png;base64,aGVsbG8=" })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].is_string());
  assert!(!dir.join("bottles").exists());
}

#[tokio::test]
async fn malformed_path_id_is_a_json_bad_request() {
  let app = app(StubEnricher::default()).await;

  for (method, uri) in [
    ("GET", "/bottles/ten"),
    ("POST", "/bottles/ten/description"),
    ("GET", "/events/x1"),
  ] {
    let (status, body) = send(&app, method, uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
    assert!(body["error"].is_string(), "{method} {uri}: {body}");
  }
}

// ─── Users & reviews ─────────────────────────────────────────────────────────

#[tokio::test]
async fn review_by_name() {
  let app = app(StubEnricher::default()).await;
  add_user(&app, "ann").await;
  let bottle = add_bottle(&app, "Ardbeg", "Ten", "Scotch").await;

  let (status, body) = send(
    &app,
    "POST",
    "/reviews",
    Some(json!({
      "name": "ANN", "bottle_id": bottle, "notes": "smoky", "score": 9,
      "tasting_notes": ["peat"]
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  assert!(body["review_id"].as_i64().is_some());

  let (_, users) = send(&app, "GET", "/users", None).await;
  assert_eq!(users[0]["name"], "Ann");
  assert_eq!(users[0]["reviews"][0]["score"], 9);

  let (_, detail) = send(&app, "GET", &format!("/bottles/{bottle}"), None).await;
  assert_eq!(detail["community_notes"][0]["name"], "peat");
}

#[tokio::test]
async fn review_errors() {
  let app = app(StubEnricher::default()).await;
  add_user(&app, "ann").await;
  let bottle = add_bottle(&app, "Ardbeg", "Ten", "Scotch").await;

  let review = |name: &str, score: i64| {
    json!({ "name": name, "bottle_id": bottle, "notes": "", "score": score })
  };
  let (status, _) = send(&app, "POST", "/reviews", Some(review("nobody", 5))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, body) = send(&app, "POST", "/reviews", Some(review("ann", 11))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("11"));
}

// ─── Events ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn event_lifecycle() {
  let app = app(StubEnricher::default()).await;
  let bottle = add_bottle(&app, "Ardbeg", "Ten", "Scotch").await;
  let user = add_user(&app, "ann").await;

  let (status, body) = send(
    &app,
    "POST",
    "/events",
    Some(json!({ "name": "Islay night", "code": "ISLAY", "event_date": "2024-05-01" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  let event = body["id"].as_i64().unwrap();

  let (status, _) =
    send(&app, "POST", &format!("/events/{event}/bottles"), Some(json!({ "ids": [bottle] }))).await;
  assert_eq!(status, StatusCode::OK);
  let (status, _) =
    send(&app, "POST", &format!("/events/{event}/users"), Some(json!({ "ids": [user] }))).await;
  assert_eq!(status, StatusCode::OK);

  let (_, detail) = send(&app, "GET", &format!("/events/{event}"), None).await;
  assert_eq!(detail["event_date"], "2024-05-01");
  assert_eq!(detail["bottles"][0]["id"], bottle);
  assert_eq!(detail["users"][0]["name"], "Ann");

  let (status, _) = send(&app, "POST", "/events/77/users", Some(json!({ "ids": [user] }))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Tasting notes & admin ───────────────────────────────────────────────────

#[tokio::test]
async fn tasting_note_tree_and_create() {
  let app = app(StubEnricher::default()).await;
  let (status, tree) = send(&app, "GET", "/tasting_notes", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(tree[0]["name"], "Fruity");
  assert!(tree[0]["subnotes"].as_array().unwrap().iter().any(|s| s["name"] == "Berry"));

  let (status, _) = send(
    &app,
    "POST",
    "/tasting_notes",
    Some(json!({ "name": "heather honey", "parent": "Dessert", "tier": 1 })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, _) = send(
    &app,
    "POST",
    "/tasting_notes",
    Some(json!({ "name": "Umami", "parent": "Fruity", "tier": 3 })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_tasting_notes_are_rejected() {
  let app = app(StubEnricher::default()).await;

  let (status, body) = send(
    &app,
    "POST",
    "/tasting_notes",
    Some(json!({ "name": "Berry", "parent": "Spice", "tier": 2 })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("already exists"));

  let (status, _) = send(
    &app,
    "POST",
    "/tasting_notes",
    Some(json!({ "name": "Fruity", "parent": null, "tier": 3 })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (_, tree) = send(&app, "GET", "/tasting_notes", None).await;
  let roots = tree.as_array().unwrap();
  assert_eq!(roots.iter().filter(|r| r["name"] == "Fruity").count(), 1);
  let spice = roots.iter().find(|r| r["name"] == "Spice").unwrap();
  assert!(!spice["subnotes"].as_array().unwrap().iter().any(|m| m["name"] == "Berry"));
}

#[tokio::test]
async fn remove_entry() {
  let app = app(StubEnricher::default()).await;
  let bottle = add_bottle(&app, "Ardbeg", "Ten", "Scotch").await;

  let (status, _) =
    send(&app, "POST", "/remove_entry", Some(json!({ "table": "sqlite_master", "id": 1 }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, _) =
    send(&app, "POST", "/remove_entry", Some(json!({ "table": "bottles", "id": bottle }))).await;
  assert_eq!(status, StatusCode::OK);

  let (status, _) =
    send(&app, "POST", "/remove_entry", Some(json!({ "table": "bottles", "id": bottle }))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Enrichment ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn expert_notes_are_stored_from_vocabulary_only() {
  let app = app(StubEnricher {
    notes: vec!["peat".into(), "stardust".into()],
    ..Default::default()
  })
  .await;
  let id = add_bottle(&app, "Ardbeg", "Ten", "Scotch").await;

  let (status, report) = send(&app, "POST", &format!("/bottles/{id}/expert_notes"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(report["bottle"], "Ardbeg Ten Scotch");
  assert_eq!(report["notes"], json!(["peat"]));

  let (_, names) = send(&app, "GET", &format!("/bottles/{id}/expert_notes"), None).await;
  assert_eq!(names, json!(["peat"]));
}

#[tokio::test]
async fn description_is_stored_unless_empty() {
  let app = app(StubEnricher { description: "Peat forward.".into(), ..Default::default() }).await;
  let id = add_bottle(&app, "Ardbeg", "Ten", "Scotch").await;

  let (status, body) = send(&app, "POST", &format!("/bottles/{id}/description"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["updated"], true);
  let (_, bottle) = send(&app, "GET", &format!("/bottles/{id}"), None).await;
  assert_eq!(bottle["description"], "Peat forward.");

  let empty = self::app(StubEnricher::default()).await;
  let id = add_bottle(&empty, "Ardbeg", "Ten", "Scotch").await;
  let (_, body) = send(&empty, "POST", &format!("/bottles/{id}/description"), None).await;
  assert_eq!(body["updated"], false);
}

#[tokio::test]
async fn enrichment_failure_is_500() {
  let app = app(StubEnricher { fail: true, ..Default::default() }).await;
  let id = add_bottle(&app, "Ardbeg", "Ten", "Scotch").await;
  let (status, body) = send(&app, "POST", &format!("/bottles/{id}/description"), None).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert!(body["error"].as_str().unwrap().contains("model unavailable"));
}

#[tokio::test]
async fn refresh_reports_per_bottle_outcomes() {
  let app = app(StubEnricher {
    description: "Official copy.".into(),
    notes: vec!["smoke".into()],
    ..Default::default()
  })
  .await;
  let a = add_bottle(&app, "Ardbeg", "Ten", "Scotch").await;
  let b = add_bottle(&app, "Lagavulin", "16", "Scotch").await;
  send(&app, "PATCH", &format!("/bottles/{b}"), Some(json!({ "description": "Already set" }))).await;

  let (status, report) = send(&app, "POST", "/refresh/descriptions", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(report["updated"], json!([a]));
  assert_eq!(report["errors"], json!([]));

  let (_, report) = send(&app, "POST", "/refresh/expert_notes", None).await;
  let mut updated: Vec<i64> =
    report["updated"].as_array().unwrap().iter().map(|v| v.as_i64().unwrap()).collect();
  updated.sort();
  assert_eq!(updated, [a, b]);

  // Nothing left to do on a second pass.
  let (_, report) = send(&app, "POST", "/refresh/expert_notes", None).await;
  assert_eq!(report["updated"], json!([]));
}

#[tokio::test]
async fn refresh_collects_errors_without_aborting() {
  let app = app(StubEnricher { fail: true, ..Default::default() }).await;
  let a = add_bottle(&app, "Ardbeg", "Ten", "Scotch").await;
  let b = add_bottle(&app, "Lagavulin", "16", "Scotch").await;

  let (status, report) = send(&app, "POST", "/refresh/expert_notes", None).await;
  assert_eq!(status, StatusCode::OK);
  let ids: Vec<i64> = report["errors"]
    .as_array()
    .unwrap()
    .iter()
    .map(|e| e["id"].as_i64().unwrap())
    .collect();
  assert_eq!(ids.len(), 2);
  assert!(ids.contains(&a) && ids.contains(&b));
}
