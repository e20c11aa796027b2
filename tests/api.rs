//! End-to-end tests of the HTTP surface

use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use widget_timer::{
    api::create_router,
    services::{CommandAlarm, LedgerWakeLocks},
    state::{AppState, SharedPreferences, WidgetPreferences},
};

struct Harness {
    router: Router,
    state: Arc<AppState>,
    locks: Arc<LedgerWakeLocks>,
}

fn harness() -> Harness {
    let prefs = WidgetPreferences::new(Arc::new(SharedPreferences::in_memory()));
    let locks = Arc::new(LedgerWakeLocks::new());
    let state = Arc::new(AppState::new(
        20554,
        "127.0.0.1".to_string(),
        prefs,
        Arc::new(CommandAlarm::silent()),
        locks.clone(),
    ));
    Harness {
        router: create_router(Arc::clone(&state)),
        state,
        locks,
    }
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test(start_paused = true)]
async fn test_configure_then_tap_runs_countdown() {
    let h = harness();

    let (status, body) = send(
        &h.router,
        Method::POST,
        "/widgets/7/configure",
        Some(json!({"minutes": 2, "seconds": 0, "keep_screen_on": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "configured");
    assert_eq!(body["widget"]["view"]["layout"], "label");
    assert_eq!(body["widget"]["view"]["primary"], "2");
    assert_eq!(body["widget"]["view"]["secondary"], "Minutes");
    assert_eq!(body["widget"]["view"]["on_click"]["duration_seconds"], 120);

    let (status, body) = send(&h.router, Method::POST, "/widgets/7/toggle", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "started");
    assert_eq!(body["widget"]["countdown"]["wake_lock"], "screen_bright");
    assert_eq!(h.locks.held(7), 1);

    tokio::time::sleep(Duration::from_millis(3100)).await;

    let (_, body) = send(&h.router, Method::GET, "/widgets/7", None).await;
    assert_eq!(body["view"]["layout"], "countdown");
    assert_eq!(body["view"]["text"], "1:57");
    assert_eq!(body["countdown"]["phase"], "running");

    let (_, status_body) = send(&h.router, Method::GET, "/status", None).await;
    assert_eq!(status_body["idle"], false);
    assert_eq!(status_body["countdowns"].as_array().unwrap().len(), 1);

    let (_, body) = send(&h.router, Method::POST, "/widgets/7/toggle", None).await;
    assert_eq!(body["status"], "stopped");
    assert_eq!(body["widget"]["view"]["layout"], "label");
    assert_eq!(h.locks.held(7), 0);

    let (_, status_body) = send(&h.router, Method::GET, "/status", None).await;
    assert_eq!(status_body["idle"], true);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_widget_is_not_found() {
    let h = harness();

    let (status, _) = send(&h.router, Method::POST, "/widgets/3/toggle", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&h.router, Method::GET, "/widgets/3", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&h.router, Method::DELETE, "/widgets/3", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&h.router, Method::POST, "/notifications/3/dismiss", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(start_paused = true)]
async fn test_zero_duration_widget_is_ignored() {
    let h = harness();
    send(&h.router, Method::POST, "/widgets/1/configure", Some(json!({}))).await;

    let (status, body) = send(&h.router, Method::POST, "/widgets/1/toggle", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ignored");
    assert!(body["widget"]["countdown"].is_null());
    assert_eq!(h.locks.total_held(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_alarm_with_display_off_posts_notification() {
    let h = harness();
    send(
        &h.router,
        Method::POST,
        "/widgets/4/configure",
        Some(json!({"seconds": 3})),
    )
    .await;

    let (status, _) = send(&h.router, Method::POST, "/display", Some(json!({"interactive": false}))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    send(&h.router, Method::POST, "/widgets/4/toggle", None).await;
    tokio::time::sleep(Duration::from_millis(3100)).await;

    let (_, notifications) = send(&h.router, Method::GET, "/notifications", None).await;
    let posted = notifications.as_array().unwrap();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0]["id"], 4);
    assert_eq!(posted[0]["title"], "Time is up!");

    let (_, status_body) = send(&h.router, Method::GET, "/status", None).await;
    assert_eq!(status_body["alarms_fired"], 1);
    assert_eq!(status_body["display_interactive"], true);

    let (status, body) = send(&h.router, Method::POST, "/notifications/4/dismiss", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "stopped");
    assert!(!h.state.alarm.is_ringing(4));

    let (_, notifications) = send(&h.router, Method::GET, "/notifications", None).await;
    assert!(notifications.as_array().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_countdown_returns_to_label_after_grace_period() {
    let h = harness();
    send(
        &h.router,
        Method::POST,
        "/widgets/2/configure",
        Some(json!({"seconds": 2})),
    )
    .await;
    send(&h.router, Method::POST, "/widgets/2/toggle", None).await;

    // zero at 2s, -60 at 17s
    tokio::time::sleep(Duration::from_millis(17_100)).await;

    let (_, body) = send(&h.router, Method::GET, "/widgets/2", None).await;
    assert_eq!(body["view"]["layout"], "label");
    assert_eq!(body["view"]["primary"], "2");
    assert_eq!(body["view"]["secondary"], "Seconds");
    assert!(body["countdown"].is_null());
    assert_eq!(h.locks.total_held(), 0);

    let (_, body) = send(&h.router, Method::POST, "/widgets/2/toggle", None).await;
    assert_eq!(body["status"], "started");
    h.state.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_remove_widget_deletes_configuration() {
    let h = harness();
    send(
        &h.router,
        Method::POST,
        "/widgets/9/configure",
        Some(json!({"minutes": 5})),
    )
    .await;
    send(&h.router, Method::POST, "/widgets/9/toggle", None).await;

    let (status, body) = send(&h.router, Method::DELETE, "/widgets/9", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "removed");
    assert_eq!(h.locks.total_held(), 0);

    let (status, _) = send(&h.router, Method::GET, "/widgets/9", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, widgets) = send(&h.router, Method::GET, "/widgets", None).await;
    assert!(widgets.as_object().unwrap().is_empty());
}

#[tokio::test]
async fn test_health_and_about() {
    let h = harness();

    let (status, body) = send(&h.router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let response = h
        .router
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("Tap the widget"));
}
