//! Integration tests for parse-stage request rejection: everything here
//! fails (with the standard error envelope) before any database access.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post, post_json};

// ---------------------------------------------------------------------------
// Test: Unknown entity type is rejected by the registry
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_entity_type_returns_400() {
    let app = common::build_test_app();
    let id = uuid_string();
    let response = post(app, &format!("/api/v1/widgets/{id}/approve")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("Unknown entity type"));
}

// ---------------------------------------------------------------------------
// Test: Malformed entity id is rejected by path extraction
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_entity_id_returns_400() {
    let app = common::build_test_app();
    let response = post(app, "/api/v1/ideas/not-a-uuid/approve").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: Project creation validates num_episodes before persisting
// ---------------------------------------------------------------------------

#[tokio::test]
async fn project_create_rejects_out_of_range_num_episodes() {
    let app = common::build_test_app();
    let response = post_json(app, "/api/v1/projects", r#"{ "num_episodes": 3 }"#).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].as_str().unwrap().contains("num_episodes"));
}

#[tokio::test]
async fn project_update_rejects_out_of_range_num_episodes() {
    let app = common::build_test_app();
    let id = uuid_string();
    let response = common::request_json(
        app,
        "PATCH",
        &format!("/api/v1/projects/{id}"),
        r#"{ "num_episodes": 26 }"#,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: Stuck-entity window must be positive
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stuck_window_must_be_at_least_one_minute() {
    let app = common::build_test_app();
    let id = uuid_string();
    let response = get(app, &format!("/api/v1/projects/{id}/stuck?minutes=0")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("at least 1"));
}

fn uuid_string() -> String {
    "7b1c6a20-9a4f-4f3e-8b44-2f6a1c9d0e11".to_string()
}
