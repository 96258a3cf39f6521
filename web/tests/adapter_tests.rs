//! Integration tests for the axum adapter
//!
//! Soft failures must be indistinguishable from an unrouted request; hard
//! failures must surface as the standard error response.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use mvc_dispatch_core::{
    CanExecute, ControllerDefinition, ControllerRegistry, DispatchOptions, Dispatcher,
};
use mvc_dispatch_testing::{EchoViewEngine, RecordingObserver};
use mvc_dispatch_web::router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

// ============================================================================
// Test Fixtures
// ============================================================================

fn app(observer: &RecordingObserver) -> Router {
    let registry = ControllerRegistry::new()
        .register(
            ControllerDefinition::<()>::with_default("home")
                .sync_action("index", |ctl, _req| ctl.view_default(json!({"title": "Home"})))
                .sync_action("api", |ctl, _req| ctl.json(&json!({"ok": true})))
                .sync_action("broken", |_ctl, _req| json!({"not": "a result"}))
                .sync_action("gone", |ctl, _req| ctl.notfound())
                .sync_action("aboutUs", |_ctl, _req| "about us"),
        )
        .register(
            ControllerDefinition::<()>::with_default("admin")
                .sync_action("index", |_ctl, _req| "secret")
                .can_execute(CanExecute::Static(false)),
        );

    let dispatcher = Dispatcher::new(registry, DispatchOptions::default())
        .with_view_engine(Arc::new(EchoViewEngine))
        .with_observer(Arc::new(observer.clone()));

    router(
        dispatcher,
        Router::new().fallback(|| async { (StatusCode::NOT_FOUND, "no route") }),
    )
}

async fn send(app: Router, uri: &str) -> (StatusCode, Response) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    (response.status(), response)
}

async fn text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn view_results_render_through_the_engine() {
    let observer = RecordingObserver::new();
    let (status, response) = send(app(&observer), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
    assert_eq!(text(response).await, r#"home/index|{"title":"Home"}"#);
    assert_eq!(observer.events().len(), 5);
}

#[tokio::test]
async fn json_results_set_content_type() {
    let observer = RecordingObserver::new();
    let (status, response) = send(app(&observer), "/home/api").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    let body: Value = serde_json::from_str(&text(response).await).unwrap();
    assert_eq!(body, json!({"ok": true}));
}

#[tokio::test]
async fn denied_and_unmatched_look_like_unrouted_requests() {
    let observer = RecordingObserver::new();

    let (denied_status, denied) = send(app(&observer), "/admin/index").await;
    let (missing_status, missing) = send(app(&observer), "/home/nothing").await;
    let (unknown_status, unknown) = send(app(&observer), "/nobody/index").await;

    assert_eq!(denied_status, StatusCode::NOT_FOUND);
    assert_eq!(missing_status, StatusCode::NOT_FOUND);
    assert_eq!(unknown_status, StatusCode::NOT_FOUND);
    assert_eq!(text(denied).await, "no route");
    assert_eq!(text(missing).await, "no route");
    assert_eq!(text(unknown).await, "no route");
}

#[tokio::test]
async fn contract_violations_become_server_errors() {
    let observer = RecordingObserver::new();
    let (status, response) = send(app(&observer), "/home/broken").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_str(&text(response).await).unwrap();
    assert_eq!(body["code"], "CONTRACT_VIOLATION");
    assert_eq!(body["message"], "An internal error occurred");
}

#[tokio::test]
async fn notfound_result_is_answered_by_the_controller() {
    let observer = RecordingObserver::new();
    let (status, response) = send(app(&observer), "/home/gone").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(text(response).await.is_empty());
}

#[tokio::test]
async fn percent_encoded_segments_are_decoded_before_naming() {
    let observer = RecordingObserver::new();
    let (status, response) = send(app(&observer), "/home/about%20us").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(text(response).await, "about us");
}

#[tokio::test]
async fn undecodable_segments_are_deferred() {
    let observer = RecordingObserver::new();
    let (status, response) = send(app(&observer), "/home/%FF%FE").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(text(response).await, "no route");
    assert!(observer.events().is_empty());
}
