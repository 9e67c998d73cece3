//! Router tests driven through `tower::ServiceExt::oneshot`.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use trip_server::config::EngineConfig;
use trip_server::web::{AppState, create_router};

const PAGE: &str = "/trips?start=2024-07-10&end=2024-07-20";

fn app() -> Router {
    create_router(AppState::in_memory(EngineConfig::default()))
}

fn trip(i: usize) -> Value {
    let (team, city) = if i % 2 == 0 {
        ("BOS", "Boston")
    } else {
        ("NYY", "New York")
    };
    json!({
        "id": format!("trip-{i}"),
        "variants": [
            {
                "cities": [city],
                "teams": [team],
                "gameCount": 3,
                "hotelChanges": 2,
                "travelMinutes": 90
            },
            {
                "cities": [city],
                "teams": [team],
                "gameCount": 3,
                "hotelChanges": 0,
                "travelMinutes": 240
            }
        ]
    })
}

fn search_body(n: usize) -> Value {
    json!({
        "pageKey": PAGE,
        "requestId": "req-42",
        "searchParams": {"startDate": "2024-07-10", "teams": ["BOS"]},
        "trips": (0..n).map(trip).collect::<Vec<_>>(),
        "tbdGames": []
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| json!(String::from_utf8_lossy(&bytes)))
    };
    (status, value)
}

fn event_types(body: &Value) -> Vec<&str> {
    body["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["type"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn health() {
    let (status, body) = send(&app(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("ok"));
}

#[tokio::test]
async fn search_returns_first_batch() {
    let app = app();
    let (status, body) = send(&app, "POST", "/sessions/alice/search", Some(search_body(12))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(event_types(&body), ["filterStateChanged", "batchRevealed"]);
    assert_eq!(body["model"]["cursor"]["revealed"], 5);
    assert_eq!(body["model"]["cursor"]["total"], 12);
    assert_eq!(body["model"]["cursor"]["hasMore"], true);
    assert_eq!(body["model"]["phase"], "revealing");

    // Unbounded ceiling shows the fastest variant first
    let first = &body["model"]["trips"][0];
    assert_eq!(first["id"], "trip-0");
    assert_eq!(first["chosen"], 0);
    assert_eq!(first["variants"][0]["travelMinutes"], 90);
}

#[tokio::test]
async fn reveal_pages_through_results() {
    let app = app();
    send(&app, "POST", "/sessions/bob/search", Some(search_body(7))).await;

    let (status, body) = send(&app, "POST", "/sessions/bob/reveal", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["events"][0]["trips"].as_array().unwrap().len(), 2);
    assert_eq!(body["model"]["cursor"]["hasMore"], false);

    let (_, body) = send(&app, "POST", "/sessions/bob/reveal", None).await;
    assert!(body["events"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn draft_then_commit_filters() {
    let app = app();
    send(&app, "POST", "/sessions/carol/search", Some(search_body(10))).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/sessions/carol/filters/draft",
        Some(json!({"field": "team", "value": "NYY"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(event_types(&body), ["filterStateChanged"]);
    assert_eq!(body["events"][0]["filters"]["dirty"], true);
    assert_eq!(body["model"]["cursor"]["total"], 10);

    let (_, body) = send(&app, "POST", "/sessions/carol/filters/commit", None).await;
    assert_eq!(body["model"]["cursor"]["total"], 5);
    assert_eq!(body["model"]["filters"]["active"][0]["field"], "team");

    let (_, body) = send(&app, "POST", "/sessions/carol/filters/clear", None).await;
    assert_eq!(body["model"]["cursor"]["total"], 10);
}

#[tokio::test]
async fn hotel_ceiling_picks_compliant_variant() {
    let app = app();
    send(&app, "POST", "/sessions/dave/search", Some(search_body(3))).await;
    send(
        &app,
        "PUT",
        "/sessions/dave/filters/draft",
        Some(json!({"field": "maxHotelChanges", "value": 1})),
    )
    .await;

    let (_, body) = send(&app, "POST", "/sessions/dave/filters/commit", None).await;
    let first = &body["model"]["trips"][0];
    assert_eq!(first["variants"][0]["hotelChanges"], 0);
    assert_eq!(first["chosen"], 0);
}

#[tokio::test]
async fn unknown_filter_field_is_rejected() {
    let app = app();
    send(&app, "POST", "/sessions/erin/search", Some(search_body(3))).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/sessions/erin/filters/draft",
        Some(json!({"field": "stadium", "value": "Fenway"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("stadium"));
}

#[tokio::test]
async fn unknown_client_is_not_found() {
    let (status, _) = send(&app(), "POST", "/sessions/nobody/reveal", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_client_id_is_rejected() {
    let (status, _) = send(&app(), "GET", "/sessions/a.b/model", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reload_restores_cursor_and_scroll() {
    let app = app();
    send(&app, "POST", "/sessions/frank/search", Some(search_body(20))).await;
    send(&app, "POST", "/sessions/frank/reveal", None).await;
    send(&app, "POST", "/sessions/frank/reveal", None).await;
    let (status, _) = send(
        &app,
        "POST",
        "/sessions/frank/scroll",
        Some(json!({"position": 2400})),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    send(
        &app,
        "POST",
        "/sessions/frank/page-events",
        Some(json!({"event": "unload"})),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        "/sessions/frank/load",
        Some(json!({"pageKey": PAGE, "loadKind": "reload"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["restored"], true);
    assert_eq!(body["revealed"], 15);
    assert_eq!(body["scrollPosition"], 2400);
    assert_eq!(
        event_types(&body),
        [
            "filterStateChanged",
            "batchRevealed",
            "batchRevealed",
            "batchRevealed",
            "scrollApplied"
        ]
    );
    assert_eq!(body["model"]["cursor"]["revealed"], 15);
}

#[tokio::test]
async fn link_navigation_drops_snapshot() {
    let app = app();
    send(&app, "POST", "/sessions/grace/search", Some(search_body(8))).await;

    let (_, phase) = send(
        &app,
        "POST",
        "/sessions/grace/page-events",
        Some(json!({"event": "sameOriginLinkActivated"})),
    )
    .await;
    assert_eq!(phase["phase"], "navigationPending");

    let (_, phase) = send(
        &app,
        "POST",
        "/sessions/grace/page-events",
        Some(json!({"event": "unload"})),
    )
    .await;
    assert_eq!(phase["phase"], "unloaded");
    assert_eq!(phase["unload"], "navigation");

    let (_, body) = send(
        &app,
        "POST",
        "/sessions/grace/load",
        Some(json!({"pageKey": PAGE, "loadKind": "reload"})),
    )
    .await;
    assert_eq!(body["restored"], false);
    assert_eq!(body["absence"], "navigation");

    // Deleted, so a second load finds nothing
    let (_, body) = send(
        &app,
        "POST",
        "/sessions/grace/load",
        Some(json!({"pageKey": PAGE, "loadKind": "reload"})),
    )
    .await;
    assert_eq!(body["absence"], "missing");
}

#[tokio::test]
async fn load_on_other_page_is_mismatch() {
    let app = app();
    send(&app, "POST", "/sessions/heidi/search", Some(search_body(4))).await;

    let (_, body) = send(
        &app,
        "POST",
        "/sessions/heidi/load",
        Some(json!({"pageKey": "/trips?start=2024-09-01", "loadKind": "reload"})),
    )
    .await;

    assert_eq!(body["restored"], false);
    assert_eq!(body["absence"], "pageMismatch");
    assert_eq!(body["model"]["phase"], "empty");
}

#[tokio::test]
async fn form_defaults_skip_team_selection() {
    let app = app();
    let (_, body) = send(&app, "GET", "/sessions/ivan/form-defaults", None).await;
    assert_eq!(body["values"], Value::Null);

    send(&app, "POST", "/sessions/ivan/search", Some(search_body(2))).await;

    let (_, body) = send(&app, "GET", "/sessions/ivan/form-defaults", None).await;
    assert_eq!(body["values"]["startDate"], "2024-07-10");
    assert!(body["values"].get("teams").is_none());
}

#[tokio::test]
async fn clients_do_not_share_snapshots() {
    let app = app();
    send(&app, "POST", "/sessions/judy/search", Some(search_body(6))).await;

    let (_, body) = send(
        &app,
        "POST",
        "/sessions/mallory/load",
        Some(json!({"pageKey": PAGE, "loadKind": "reload"})),
    )
    .await;

    assert_eq!(body["absence"], "missing");
}
