use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tour_core::{
    collaborators::testing::{RecordingBlogPublisher, StaticPurchaseGate},
    RetryPolicy, TourServiceBuilder,
};
use tour_server::{router, AppState};
use tower::ServiceExt;

/// Helper function to create a router over a fresh database
async fn create_test_app(blog: RecordingBlogPublisher, gate: StaticPurchaseGate) -> (TempDir, Router) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let service = TourServiceBuilder::new()
        .with_database_path(Some(temp_dir.path().join("test.db")))
        .with_blog_publisher(Arc::new(blog))
        .with_purchase_gate(Arc::new(gate))
        .with_compensation_retry(RetryPolicy::none())
        .build()
        .await
        .expect("Failed to create service");
    (temp_dir, router(AppState::new(service)))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    caller: Option<(&str, &str)>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some((username, role)) = caller {
        request = request
            .header("x-username", username)
            .header("x-user-role", role);
    }
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app.clone().oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

const GUIDE: Option<(&str, &str)> = Some(("guide1", "guide"));
const TOURIST: Option<(&str, &str)> = Some(("tourist1", "tourist"));

fn tour_body() -> Value {
    json!({
        "name": "Fortress loop",
        "description": "Walls, tunnels and the clock tower",
        "difficulty": "hard",
        "tags": ["history", "tunnels"],
        "price": 30.0,
        "transport_details": [{"duration": 150, "transport_type": "walking"}],
        "key_points": [
            {"name": "Clock tower", "latitude": 45.2517, "longitude": 19.8625},
            {"name": "Tunnels", "latitude": 45.2530, "longitude": 19.8650}
        ]
    })
}

async fn create_published_tour(app: &Router) -> u64 {
    let (status, tour) = send(app, "POST", "/tours", GUIDE, Some(tour_body())).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = tour["id"].as_u64().expect("tour id");
    let (status, _) = send(app, "PUT", &format!("/tours/{id}/publish"), GUIDE, None).await;
    assert_eq!(status, StatusCode::OK);
    id
}

#[tokio::test]
async fn test_ping() {
    let (_temp_dir, app) =
        create_test_app(RecordingBlogPublisher::accepting(), StaticPurchaseGate::new()).await;

    let (status, body) = send(&app, "GET", "/internal/ping", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "pong");
    assert_eq!(body["service"], "tour-service");
}

#[tokio::test]
async fn test_undecodable_requests_get_json_errors() {
    let (_temp_dir, app) =
        create_test_app(RecordingBlogPublisher::accepting(), StaticPurchaseGate::new()).await;

    let request = Request::builder()
        .method("POST")
        .uri("/tours")
        .header("x-username", "guide1")
        .header("x-user-role", "guide")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .expect("Failed to build request");
    let response = app.clone().oneshot(request).await.expect("Request failed");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get("content-type").and_then(|v| v.to_str().ok()),
        Some("application/json")
    );
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    let body: Value = serde_json::from_slice(&bytes).expect("JSON error body");
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, body) = send(&app, "POST", "/tours", GUIDE, Some(json!({"name": "x"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["error"].as_str().is_some_and(|e| e.contains("difficulty")));

    let (status, body) = send(&app, "GET", "/tours/abc", GUIDE, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_identity_is_required() {
    let (_temp_dir, app) =
        create_test_app(RecordingBlogPublisher::accepting(), StaticPurchaseGate::new()).await;

    let (status, body) = send(&app, "POST", "/tours", None, Some(tour_body())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHENTICATED");

    let (status, _) = send(&app, "POST", "/tours", TOURIST, Some(tour_body())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_and_fetch_tour() {
    let (_temp_dir, app) =
        create_test_app(RecordingBlogPublisher::accepting(), StaticPurchaseGate::new()).await;

    let (status, tour) = send(&app, "POST", "/tours", GUIDE, Some(tour_body())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tour["status"], "draft");
    assert_eq!(tour["price"], 0.0);
    assert_eq!(tour["key_points"].as_array().map(Vec::len), Some(2));

    let id = tour["id"].as_u64().unwrap();
    let (status, fetched) = send(&app, "GET", &format!("/tours/{id}"), TOURIST, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Fortress loop");

    let (status, body) = send(&app, "GET", "/tours/999", TOURIST, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_invalid_difficulty_is_unprocessable() {
    let (_temp_dir, app) =
        create_test_app(RecordingBlogPublisher::accepting(), StaticPurchaseGate::new()).await;

    let mut body = tour_body();
    body["difficulty"] = json!("extreme");
    let (status, body) = send(&app, "POST", "/tours", GUIDE, Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_lifecycle_over_http() {
    let (_temp_dir, app) =
        create_test_app(RecordingBlogPublisher::accepting(), StaticPurchaseGate::new()).await;
    let id = create_published_tour(&app).await;

    let (status, body) = send(&app, "GET", "/tours", TOURIST, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["tours"][0]["price"], 30.0);

    let (status, _) = send(&app, "PUT", &format!("/tours/{id}/publish"), GUIDE, None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/tours/{id}/archive"),
        Some(("guide2", "guide")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "PUT", &format!("/tours/{id}/archive"), GUIDE, None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, "GET", "/tours", TOURIST, None).await;
    assert_eq!(body["count"], 0);

    let (status, _) = send(&app, "PUT", &format!("/tours/{id}/unarchive"), GUIDE, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/tours/mine", GUIDE, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn test_update_and_add_key_point_only_on_drafts() {
    let (_temp_dir, app) =
        create_test_app(RecordingBlogPublisher::accepting(), StaticPurchaseGate::new()).await;

    let (_, tour) = send(&app, "POST", "/tours", GUIDE, Some(tour_body())).await;
    let id = tour["id"].as_u64().unwrap();

    let key_point = json!({"name": "Bridge", "latitude": 45.2560, "longitude": 19.8600});
    let (status, added) = send(
        &app,
        "POST",
        &format!("/tours/{id}/key-points"),
        GUIDE,
        Some(key_point.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(added["order"], 2);

    let mut update = tour_body();
    update["name"] = json!("Fortress loop, revised");
    let (status, updated) = send(&app, "PUT", &format!("/tours/{id}"), GUIDE, Some(update.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Fortress loop, revised");
    assert_eq!(updated["key_points"].as_array().map(Vec::len), Some(2));

    let (status, _) = send(&app, "PUT", &format!("/tours/{id}/publish"), GUIDE, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "PUT", &format!("/tours/{id}"), GUIDE, Some(update)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = send(
        &app,
        "POST",
        &format!("/tours/{id}/key-points"),
        GUIDE,
        Some(key_point),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_publish_rollback_is_bad_gateway() {
    let (_temp_dir, app) =
        create_test_app(RecordingBlogPublisher::failing(), StaticPurchaseGate::new()).await;

    let (_, tour) = send(&app, "POST", "/tours", GUIDE, Some(tour_body())).await;
    let id = tour["id"].as_u64().unwrap();

    let (status, body) = send(&app, "PUT", &format!("/tours/{id}/publish"), GUIDE, None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "SAGA_ROLLBACK");

    let (_, tour) = send(&app, "GET", &format!("/tours/{id}"), GUIDE, None).await;
    assert_eq!(tour["status"], "draft");
}

#[tokio::test]
async fn test_execution_flow_over_http() {
    let gate = StaticPurchaseGate::new();
    let (_temp_dir, app) = create_test_app(RecordingBlogPublisher::accepting(), gate.clone()).await;
    let id = create_published_tour(&app).await;
    let start = json!({"tour_id": id, "latitude": 45.2500, "longitude": 19.8600});

    let (status, body) = send(&app, "POST", "/tours/executions", TOURIST, Some(start.clone())).await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["code"], "PAYMENT_REQUIRED");

    let (status, _) = send(&app, "POST", "/tours/executions", GUIDE, Some(start.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    gate.grant("tourist1", id);
    let (status, execution) =
        send(&app, "POST", "/tours/executions", TOURIST, Some(start.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(execution["status"], "active");
    let execution_id = execution["id"].as_u64().unwrap();

    let (status, _) = send(&app, "POST", "/tours/executions", TOURIST, Some(start)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, "GET", "/tours/purchased", TOURIST, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);

    let (status, result) = send(
        &app,
        "POST",
        &format!("/tours/executions/{execution_id}/check-proximity"),
        TOURIST,
        Some(json!({"latitude": 45.2518, "longitude": 19.8626})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["key_point_reached"], true);
    assert_eq!(result["message"], "Key point 'Clock tower' reached!");

    let (status, active) = send(&app, "GET", "/tours/executions/active", TOURIST, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(active["completions"].as_array().map(Vec::len), Some(1));

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/tours/executions/{execution_id}/end"),
        TOURIST,
        Some(json!({"status": "active"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, ended) = send(
        &app,
        "PUT",
        &format!("/tours/executions/{execution_id}/end"),
        TOURIST,
        Some(json!({"status": "completed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ended["status"], "completed");

    let (status, _) = send(&app, "GET", "/tours/executions/active", TOURIST, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_gate_outage_is_service_unavailable() {
    let (_temp_dir, app) = create_test_app(
        RecordingBlogPublisher::accepting(),
        StaticPurchaseGate::unavailable(),
    )
    .await;
    let id = create_published_tour(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/tours/executions",
        TOURIST,
        Some(json!({"tour_id": id, "latitude": 45.25, "longitude": 19.86})),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "DEPENDENCY_UNAVAILABLE");

    let (status, body) = send(&app, "GET", "/tours/purchased", TOURIST, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
}
