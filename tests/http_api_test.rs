//! In-process tests for the HTTP layer, driving the router directly
//! through tower's `oneshot` without binding a socket.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use one_a_two_b::{AppState, GameEngine, RecordStore, Secret, router};
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// Builds the app over a temp record file, handing back the engine so
/// tests can plant sessions with known secrets.
fn setup_app() -> (TempDir, GameEngine, Router) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = RecordStore::new(dir.path().join("records.json")).expect("Failed to open store");
    let engine = GameEngine::new();
    let app = router(AppState {
        engine: engine.clone(),
        records: Arc::new(store),
    });
    (dir, engine, app)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .expect("Failed to build request"),
        None => builder.body(Body::empty()).expect("Failed to build request"),
    };

    let response = app.clone().oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    let value = serde_json::from_slice(&bytes).expect("Body was not JSON");
    (status, value)
}

#[tokio::test]
async fn test_health_endpoint() {
    let (_dir, _engine, app) = setup_app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_new_game_returns_id() {
    let (_dir, engine, app) = setup_app();
    let (status, body) = send(&app, "POST", "/api/game/new", None).await;
    assert_eq!(status, StatusCode::OK);

    let id = body["game_id"].as_str().expect("game_id missing");
    assert_eq!(id.len(), 8);
    assert_eq!(engine.attempts(id), Ok(0));
}

#[tokio::test]
async fn test_guess_round_trip() {
    let (_dir, engine, app) = setup_app();
    let secret: Secret = "1234".parse().expect("valid secret");
    let id = engine.new_game_with_secret(secret);

    let (status, body) = send(
        &app,
        "POST",
        "/api/game/guess",
        Some(json!({ "game_id": id, "guess": "1243" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["A"], 2);
    assert_eq!(body["result"]["B"], 2);
    assert_eq!(body["is_correct"], false);
    assert_eq!(body["attempts"], 1);
}

#[tokio::test]
async fn test_winning_guess_removes_session() {
    let (_dir, engine, app) = setup_app();
    let secret: Secret = "0987".parse().expect("valid secret");
    let id = engine.new_game_with_secret(secret);

    let (status, body) = send(
        &app,
        "POST",
        "/api/game/guess",
        Some(json!({ "game_id": id, "guess": "0987" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["A"], 4);
    assert_eq!(body["is_correct"], true);
    assert_eq!(body["attempts"], 1);

    // The won session is gone; a second guess is a 404.
    let (status, body) = send(
        &app,
        "POST",
        "/api/game/guess",
        Some(json!({ "game_id": id, "guess": "0987" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Game not found");
}

#[tokio::test]
async fn test_malformed_guess_is_bad_request() {
    let (_dir, engine, app) = setup_app();
    let secret: Secret = "1234".parse().expect("valid secret");
    let id = engine.new_game_with_secret(secret);

    let (status, body) = send(
        &app,
        "POST",
        "/api/game/guess",
        Some(json!({ "game_id": id, "guess": "1123" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Digits must not repeat");
    // The failed guess still consumed an attempt.
    assert_eq!(engine.attempts(&id), Ok(1));
}

#[tokio::test]
async fn test_guess_against_unknown_game_is_not_found() {
    let (_dir, _engine, app) = setup_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/game/guess",
        Some(json!({ "game_id": "nosuchid", "guess": "1234" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Game not found");
}

#[tokio::test]
async fn test_records_round_trip() {
    let (_dir, _engine, app) = setup_app();

    let (status, body) = send(&app, "GET", "/api/records", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "best_attempts": null, "best_time": null }));

    let (status, body) = send(
        &app,
        "POST",
        "/api/records",
        Some(json!({ "attempts": 5, "time": 30.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "updated": true }));

    let (status, body) = send(
        &app,
        "POST",
        "/api/records",
        Some(json!({ "attempts": 6, "time": 40.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "updated": false }));

    let (status, body) = send(&app, "GET", "/api/records", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["best_attempts"], 5);
    assert_eq!(body["best_time"], 30.0);
}
