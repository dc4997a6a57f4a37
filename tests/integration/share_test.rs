//! Integration tests for sharing and collaborator endpoints.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_view_share_grants_read_only() {
    let app = helpers::TestApp::new();
    let owner = app.create_test_user("owner@example.com").await;
    let reader = app.create_test_user("reader@example.com").await;
    let stranger = app.create_test_user("stranger@example.com").await;
    let quiz = app.create_quiz(&owner, "Shared quiz", None).await;

    let response = app
        .request(
            "POST",
            &format!("/api/quizzes/{quiz}/share"),
            Some(json!({ "emails": ["reader@example.com", "not-an-email"] })),
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data()["shared_count"], 1);
    assert_eq!(response.data()["failed_count"], 1);

    let response = app
        .request("GET", &format!("/api/quizzes/{quiz}"), None, Some(&reader))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(
            "PATCH",
            &format!("/api/quizzes/{quiz}"),
            Some(json!({ "title": "Hijacked" })),
            Some(&reader),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request("GET", &format!("/api/quizzes/{quiz}"), None, Some(&stranger))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "UNAUTHORIZED");

    let response = app
        .request(
            "DELETE",
            &format!("/api/quizzes/{quiz}/collaborators/{reader}"),
            None,
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let response = app
        .request("GET", &format!("/api/quizzes/{quiz}"), None, Some(&reader))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_collaborator_lifecycle() {
    let app = helpers::TestApp::new();
    let owner = app.create_test_user("owner@example.com").await;
    let editor = app.create_test_user("editor@example.com").await;
    let quiz = app.create_quiz(&owner, "Team quiz", None).await;

    let response = app
        .request(
            "POST",
            &format!("/api/quizzes/{quiz}/collaborators"),
            Some(json!({ "user_id": editor, "permission": "edit" })),
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);

    let response = app
        .request(
            "PATCH",
            &format!("/api/quizzes/{quiz}"),
            Some(json!({ "description": "Edited by a collaborator" })),
            Some(&editor),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(
            "GET",
            &format!("/api/quizzes/{quiz}/collaborators"),
            None,
            Some(&editor),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data().as_array().unwrap().len(), 1);

    let response = app
        .request(
            "DELETE",
            &format!("/api/quizzes/{quiz}/collaborators/{editor}"),
            None,
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(
            "PATCH",
            &format!("/api/quizzes/{quiz}"),
            Some(json!({ "description": "Too late" })),
            Some(&editor),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_share_requires_identity() {
    let app = helpers::TestApp::new();
    let owner = app.create_test_user("owner@example.com").await;
    let quiz = app.create_quiz(&owner, "Quiz", None).await;

    let response = app
        .request(
            "POST",
            &format!("/api/quizzes/{quiz}/share"),
            Some(json!({ "emails": ["someone@example.com"] })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "AUTHENTICATION_REQUIRED");
}
