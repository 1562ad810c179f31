//! Router-level tests, driven with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use dossier_core::store::InvestigationStore;
use dossier_store::{GraphStore, RelationshipPolicy};
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::api_router;

fn setup() -> (Arc<GraphStore>, Router) {
  let store = Arc::new(GraphStore::new());
  let app = api_router(store.clone());
  (store, app)
}

async fn send(
  app: &Router,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let resp = app
    .clone()
    .oneshot(builder.body(body).unwrap())
    .await
    .unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

async fn create_node(app: &Router, entity_type: &str, label: &str) -> String {
  let (status, body) = send(
    app,
    "POST",
    "/nodes",
    Some(json!({ "entity_type": entity_type, "label": label })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  body["id"].as_str().unwrap().to_owned()
}

async fn link(app: &Router, source: &str, target: &str, kind: &str) -> String {
  let (status, body) = send(
    app,
    "POST",
    "/relationships",
    Some(json!({
      "source_id": source,
      "target_id": target,
      "relation_type": kind,
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  body["id"].as_str().unwrap().to_owned()
}

// ── Nodes ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_get_node() {
  let (_, app) = setup();
  let (status, body) = send(
    &app,
    "POST",
    "/nodes",
    Some(json!({
      "entity_type": "Person",
      "label": "Alice",
      "tags": ["finance", "finance", " watch "],
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  let id = body["id"].as_str().unwrap();

  let (status, node) = send(&app, "GET", &format!("/nodes/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(node["label"], "Alice");
  assert_eq!(node["entity_type"], "Person");
  assert_eq!(node["confidence"], 1.0);
  assert_eq!(node["tags"], json!(["finance", "watch"]));
}

#[tokio::test]
async fn unknown_entity_type_is_400() {
  let (store, app) = setup();
  let (status, body) = send(
    &app,
    "POST",
    "/nodes",
    Some(json!({ "entity_type": "Spaceship", "label": "x" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("Spaceship"));
  assert!(store.list_entities().is_empty());
}

#[tokio::test]
async fn blank_label_is_400() {
  let (_, app) = setup();
  let (status, _) = send(
    &app,
    "POST",
    "/nodes",
    Some(json!({ "entity_type": "Email", "label": "   " })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_unknown_or_malformed_node_is_null() {
  let (_, app) = setup();
  let (status, body) =
    send(&app, "GET", &format!("/nodes/{}", Uuid::new_v4()), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, Value::Null);

  let (status, body) = send(&app, "GET", "/nodes/not-a-uuid", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn patch_node_updates_fields() {
  let (store, app) = setup();
  let id = create_node(&app, "Domain", "example.com").await;

  let (status, _) = send(
    &app,
    "PATCH",
    &format!("/nodes/{id}"),
    Some(json!({ "label": "example.org", "confidence": 0.4 })),
  )
  .await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let e = store.get_entity(Uuid::parse_str(&id).unwrap()).unwrap();
  assert_eq!(e.label, "example.org");
  assert_eq!(e.confidence, 0.4);
  assert!(e.updated_at >= e.created_at);
}

#[tokio::test]
async fn patch_out_of_range_confidence_leaves_node_alone() {
  let (store, app) = setup();
  let id = create_node(&app, "Domain", "example.com").await;

  let (status, _) = send(
    &app,
    "PATCH",
    &format!("/nodes/{id}"),
    Some(json!({ "label": "changed", "confidence": 1.5 })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  let e = store.get_entity(Uuid::parse_str(&id).unwrap()).unwrap();
  assert_eq!(e.label, "example.com");
}

#[tokio::test]
async fn patch_unknown_node_is_404() {
  let (_, app) = setup();
  let (status, body) = send(
    &app,
    "PATCH",
    &format!("/nodes/{}", Uuid::new_v4()),
    Some(json!({ "label": "x" })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn search_is_case_insensitive() {
  let (_, app) = setup();
  create_node(&app, "Person", "Alice Smith").await;
  create_node(&app, "Person", "Bob").await;

  let (status, body) = send(&app, "GET", "/nodes/search?query=ALICE", None).await;
  assert_eq!(status, StatusCode::OK);
  let hits = body.as_array().unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0]["label"], "Alice Smith");

  let (_, all) = send(&app, "GET", "/nodes/search", None).await;
  assert_eq!(all.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn delete_node_cascades() {
  let (store, app) = setup();
  let alice = create_node(&app, "Person", "Alice").await;
  let wallet = create_node(&app, "CryptoWallet", "0xabc").await;
  link(&app, &alice, &wallet, "Owns").await;
  let (status, _) = send(
    &app,
    "POST",
    &format!("/nodes/{alice}/attachments"),
    Some(json!({ "filename": "id.png", "content_base64": B64.encode(b"png") })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, _) = send(&app, "DELETE", &format!("/nodes/{alice}"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (_, rels) = send(&app, "GET", "/relationships", None).await;
  assert_eq!(rels, json!([]));
  assert_eq!(store.snapshot().attachments.len(), 0);
  assert_eq!(store.list_entities().len(), 1);

  let (status, _) = send(&app, "DELETE", &format!("/nodes/{alice}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_path_id_is_400() {
  let (_, app) = setup();
  let (status, body) = send(&app, "DELETE", "/nodes/nope", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("nope"));
}

// ── Relationships ────────────────────────────────────────────────────────────

#[tokio::test]
async fn relationship_defaults_and_node_view() {
  let (_, app) = setup();
  let a = create_node(&app, "Person", "Alice").await;
  let b = create_node(&app, "Organization", "Acme").await;
  let c = create_node(&app, "Person", "Carol").await;
  let ab = link(&app, &a, &b, "MemberOf").await;
  link(&app, &c, &a, "CommunicatesWith").await;

  let (status, rel) = send(&app, "GET", &format!("/relationships/{ab}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(rel["weight"], 1.0);
  assert_eq!(rel["confidence"], 0.5);
  assert_eq!(rel["source_id"], a.as_str());

  let (_, for_a) =
    send(&app, "GET", &format!("/nodes/{a}/relationships"), None).await;
  assert_eq!(for_a.as_array().unwrap().len(), 2);
  let (_, for_b) =
    send(&app, "GET", &format!("/nodes/{b}/relationships"), None).await;
  assert_eq!(for_b.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn relationship_to_missing_node_is_404() {
  let (store, app) = setup();
  let a = create_node(&app, "Person", "Alice").await;
  let (status, _) = send(
    &app,
    "POST",
    "/relationships",
    Some(json!({
      "source_id": a,
      "target_id": Uuid::new_v4().to_string(),
      "relation_type": "Owns",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(store.list_relationships().is_empty());
}

#[tokio::test]
async fn relationship_with_malformed_endpoint_is_400() {
  let (_, app) = setup();
  let a = create_node(&app, "Person", "Alice").await;
  let (status, _) = send(
    &app,
    "POST",
    "/relationships",
    Some(json!({ "source_id": a, "target_id": "zzz", "relation_type": "Owns" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn patch_and_delete_relationship() {
  let (store, app) = setup();
  let a = create_node(&app, "Person", "Alice").await;
  let b = create_node(&app, "Person", "Bob").await;
  let id = link(&app, &a, &b, "ConnectedTo").await;

  let (status, _) = send(
    &app,
    "PATCH",
    &format!("/relationships/{id}"),
    Some(json!({ "relation_type": "transactswith", "weight": 3.0 })),
  )
  .await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let rel = store.get_relationship(Uuid::parse_str(&id).unwrap()).unwrap();
  assert_eq!(rel.relation_type.as_ref(), "TransactsWith");
  assert_eq!(rel.weight, 3.0);

  let (status, _) = send(
    &app,
    "PATCH",
    &format!("/relationships/{id}"),
    Some(json!({ "relation_type": "Likes" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, _) =
    send(&app, "DELETE", &format!("/relationships/{id}"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (status, _) =
    send(&app, "DELETE", &format!("/relationships/{id}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn strict_policy_rejects_self_loop() {
  let store = Arc::new(GraphStore::with_policy(RelationshipPolicy {
    allow_self_loops: false,
    allow_duplicates: true,
  }));
  let app = api_router(store);
  let a = create_node(&app, "Person", "Alice").await;
  let (status, _) = send(
    &app,
    "POST",
    "/relationships",
    Some(json!({ "source_id": a, "target_id": a, "relation_type": "ConnectedTo" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Attachments ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn attachment_lifecycle() {
  let (_, app) = setup();
  let a = create_node(&app, "Document", "Invoice").await;
  let b = create_node(&app, "Person", "Bob").await;

  let (status, created) = send(
    &app,
    "POST",
    &format!("/nodes/{a}/attachments"),
    Some(json!({
      "filename": "Scan.PNG",
      "content_base64": B64.encode([0x89, b'P', b'N', b'G']),
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  let att = created["id"].as_str().unwrap().to_owned();

  let (_, listed) = send(&app, "GET", &format!("/nodes/{a}/attachments"), None).await;
  let listed = listed.as_array().unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0]["file_type"], "png");
  assert_eq!(listed[0]["content_base64"], B64.encode([0x89, b'P', b'N', b'G']));

  // Wrong owner.
  let (status, _) = send(
    &app,
    "DELETE",
    &format!("/nodes/{b}/attachments/{att}"),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, _) = send(
    &app,
    "DELETE",
    &format!("/nodes/{a}/attachments/{att}"),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (_, listed) = send(&app, "GET", &format!("/nodes/{a}/attachments"), None).await;
  assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn attachment_on_missing_node_is_404() {
  let (_, app) = setup();
  let (status, _) = send(
    &app,
    "POST",
    &format!("/nodes/{}/attachments", Uuid::new_v4()),
    Some(json!({ "filename": "a.txt", "content_base64": "aGk=" })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_base64_is_400() {
  let (_, app) = setup();
  let a = create_node(&app, "Document", "Memo").await;
  let (status, _) = send(
    &app,
    "POST",
    &format!("/nodes/{a}/attachments"),
    Some(json!({ "filename": "a.txt", "content_base64": "!!not base64!!" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Export, project, clear ───────────────────────────────────────────────────

#[tokio::test]
async fn export_writes_each_format() {
  let (_, app) = setup();
  let a = create_node(&app, "Domain", "example.com").await;
  let b = create_node(&app, "IpAddress", "203.0.113.7").await;
  link(&app, &a, &b, "ConnectedTo").await;

  let dir = tempfile::tempdir().unwrap();
  for (format, needle) in [
    ("json", "\"nodes\""),
    ("csv", "ConnectedTo"),
    ("graphml", "<graphml"),
  ] {
    let path = dir.path().join(format!("out.{format}"));
    let (status, _) = send(
      &app,
      "POST",
      &format!("/export/{format}"),
      Some(json!({ "file_path": path })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT, "{format}");
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains(needle), "{format}: {text}");
  }
}

#[tokio::test]
async fn export_unknown_format_is_400() {
  let (_, app) = setup();
  let dir = tempfile::tempdir().unwrap();
  let (status, _) = send(
    &app,
    "POST",
    "/export/xlsx",
    Some(json!({ "file_path": dir.path().join("x") })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn export_to_missing_directory_is_500() {
  let (store, app) = setup();
  create_node(&app, "Person", "Alice").await;
  let dir = tempfile::tempdir().unwrap();
  let (status, body) = send(
    &app,
    "POST",
    "/export/csv",
    Some(json!({ "file_path": dir.path().join("missing/out.csv") })),
  )
  .await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert!(body["error"].is_string());
  assert_eq!(store.list_entities().len(), 1);
}

#[tokio::test]
async fn save_clear_load_round_trip() {
  let (store, app) = setup();
  let a = create_node(&app, "Person", "Alice").await;
  let b = create_node(&app, "CryptoWallet", "0xabc").await;
  link(&app, &a, &b, "Owns").await;
  let before = store.snapshot();

  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("case.json");
  let (status, _) = send(
    &app,
    "POST",
    "/project/save",
    Some(json!({ "file_path": path, "project_name": "Case 42" })),
  )
  .await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (status, _) = send(&app, "DELETE", "/data", None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  assert!(store.snapshot().is_empty());

  let (status, meta) = send(
    &app,
    "POST",
    "/project/load",
    Some(json!({ "file_path": path })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(meta["project_name"], "Case 42");
  assert_eq!(meta["entity_count"], 2);
  assert_eq!(meta["relationship_count"], 1);
  assert_eq!(store.snapshot(), before);
}

#[tokio::test]
async fn json_export_loads_back_as_project() {
  let (store, app) = setup();
  let a = create_node(&app, "Person", "Smith, \"Bob\"").await;
  let b = create_node(&app, "Email", "bob@example.com").await;
  let c = create_node(&app, "Organization", "Acme\nHoldings").await;
  link(&app, &a, &b, "Owns").await;
  link(&app, &b, &c, "ConnectedTo").await;
  link(&app, &a, &a, "SameAs").await;
  let before = store.snapshot();

  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("export.json");
  let (status, _) = send(
    &app,
    "POST",
    "/export/json",
    Some(json!({ "file_path": path })),
  )
  .await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (status, _) = send(&app, "DELETE", "/data", None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  assert!(store.snapshot().is_empty());

  let (status, meta) = send(
    &app,
    "POST",
    "/project/load",
    Some(json!({ "file_path": path })),
  )
  .await;
  assert_eq!(status, StatusCode::OK, "{meta}");
  assert_eq!(meta["project_name"], "export");
  assert_eq!(meta["saved_at"], Value::Null);
  assert_eq!(meta["entity_count"], 3);
  assert_eq!(meta["relationship_count"], 3);
  assert_eq!(meta["attachment_count"], 0);
  assert_eq!(store.snapshot(), before);

  let (_, looped) = send(&app, "GET", &format!("/nodes/{a}/relationships"), None).await;
  assert!(
    looped
      .as_array()
      .unwrap()
      .iter()
      .any(|r| r["source_id"] == r["target_id"])
  );
}

#[tokio::test]
async fn load_malformed_project_is_422_and_keeps_graph() {
  let (store, app) = setup();
  create_node(&app, "Person", "Alice").await;
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("broken.json");
  std::fs::write(&path, "{ \"nodes\": [ ").unwrap();

  let (status, _) = send(
    &app,
    "POST",
    "/project/load",
    Some(json!({ "file_path": path })),
  )
  .await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(store.list_entities().len(), 1);
}

#[tokio::test]
async fn load_missing_file_is_500() {
  let (_, app) = setup();
  let dir = tempfile::tempdir().unwrap();
  let (status, _) = send(
    &app,
    "POST",
    "/project/load",
    Some(json!({ "file_path": dir.path().join("absent.json") })),
  )
  .await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
