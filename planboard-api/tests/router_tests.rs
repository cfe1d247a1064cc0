//! Router tests that never reach the database
//!
//! Authentication, role guards and request validation all reject before any
//! query runs, so these tests drive the full router over a pool that never
//! connects.

mod common;

use axum::http::{Method, StatusCode};
use common::{lazy_app, send, token_for};
use planboard_shared::auth::jwt::{create_token, Claims, TokenType};
use planboard_shared::models::user::UserRole;
use serde_json::json;

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = lazy_app();

    for (method, uri) in [
        (Method::GET, "/projects"),
        (Method::POST, "/tasks"),
        (Method::GET, "/users"),
        (Method::GET, "/users/my-tasks"),
        (Method::DELETE, "/projects/1"),
        (Method::PATCH, "/users/1"),
    ] {
        let (status, body) = send(&app, method.clone(), uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(body["error"], "unauthorized");
    }
}

#[tokio::test]
async fn test_invalid_tokens_are_unauthorized() {
    let app = lazy_app();

    let (status, _) = send(&app, Method::GET, "/projects", Some("not.a.jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let foreign = create_token(
        &Claims::new(1, "admin@example.com", UserRole::Admin, TokenType::Access),
        "some-other-secret-that-is-also-32-bytes",
    )
    .unwrap();
    let (status, _) = send(&app, Method::GET, "/projects", Some(&foreign), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let refresh = create_token(
        &Claims::new(1, "admin@example.com", UserRole::Admin, TokenType::Refresh),
        common::TEST_SECRET,
    )
    .unwrap();
    let (status, _) = send(&app, Method::GET, "/projects", Some(&refresh), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_disallowed_roles_are_forbidden() {
    let app = lazy_app();

    let cases = [
        (Method::GET, "/users", UserRole::ProjectManager),
        (Method::POST, "/users/create", UserRole::TeamLead),
        (Method::GET, "/users/5", UserRole::Member),
        (Method::DELETE, "/users/5", UserRole::ProjectManager),
        (Method::GET, "/projects", UserRole::TeamLead),
        (Method::POST, "/projects", UserRole::Member),
        (Method::DELETE, "/projects/1", UserRole::ProjectManager),
        (Method::GET, "/tasks", UserRole::Member),
        (Method::DELETE, "/tasks/1", UserRole::Member),
    ];

    for (method, uri, role) in cases {
        let token = token_for(1, role);
        let (status, body) = send(&app, method.clone(), uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{} {} as {}", method, uri, role);
        assert_eq!(body["error"], "forbidden");
    }
}

#[tokio::test]
async fn test_role_is_checked_before_body() {
    let app = lazy_app();
    let token = token_for(1, UserRole::Member);

    let (status, _) = send(
        &app,
        Method::POST,
        "/projects",
        Some(&token),
        Some(json!({ "unexpected": true })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_register_validation() {
    let app = lazy_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/users/register",
        None,
        Some(json!({ "name": "", "email": "nope", "password": "short" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");

    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|detail| detail["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "name", "password"]);
}

#[tokio::test]
async fn test_missing_body_field_is_json_validation_error() {
    let app = lazy_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/users/register",
        None,
        Some(json!({ "name": "Ada", "email": "ada@example.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "body");
    assert!(body["details"][0]["message"]
        .as_str()
        .unwrap()
        .contains("missing field `password`"));

    let token = token_for(1, UserRole::ProjectManager);
    let (status, body) = send(
        &app,
        Method::POST,
        "/projects",
        Some(&token),
        Some(json!({ "name": "Apollo", "description": "Moonshot", "member_emails": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_unparsable_path_id_is_json_bad_request() {
    let app = lazy_app();
    let token = token_for(1, UserRole::Admin);

    for uri in ["/projects/abc", "/tasks/abc", "/users/abc"] {
        let (status, body) = send(&app, Method::GET, uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["error"], "bad_request");
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn test_overlong_email_is_rejected_before_insert() {
    let app = lazy_app();
    let email = format!("{}@{}example.com", "a".repeat(64), format!("{}.", "b".repeat(60)).repeat(3));
    assert!(email.len() > 255);

    let (status, body) = send(
        &app,
        Method::POST,
        "/users/register",
        None,
        Some(json!({ "name": "Ada", "email": email, "password": "long enough" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "email");
    assert_eq!(body["details"][0]["message"], "Email must be at most 255 characters");
}

#[tokio::test]
async fn test_project_validation_runs_after_guard() {
    let app = lazy_app();
    let token = token_for(1, UserRole::ProjectManager);

    let (status, body) = send(
        &app,
        Method::POST,
        "/projects",
        Some(&token),
        Some(json!({
            "name": "Apollo",
            "description": "Moonshot",
            "team_lead_email": "not-an-email",
            "member_emails": []
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "team_lead_email");
}

#[tokio::test]
async fn test_my_tasks_for_admin_returns_message() {
    let app = lazy_app();
    let token = token_for(1, UserRole::Admin);

    let (status, body) = send(&app, Method::GET, "/users/my-tasks", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "No tasks or projects found for this user" }));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = lazy_app();

    let (status, _) = send(&app, Method::GET, "/nowhere", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_reports_degraded_without_database() {
    let app = lazy_app();

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "disconnected");
}
