//! Integration tests for quiz lifecycle, search, and bulk endpoints.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_create_quiz_derives_fields() {
    let app = helpers::TestApp::new();
    let user = app.create_test_user("author@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/quizzes",
            Some(json!({
                "title": "  Times tables ",
                "tags": ["math", " math", "arithmetic"],
                "questions": [helpers::sample_question()],
            })),
            Some(&user),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    let quiz = response.data();
    assert_eq!(quiz["title"], "Times tables");
    assert_eq!(quiz["tags"], json!(["arithmetic", "math"]));
    assert_eq!(quiz["difficulty"], "medium");
    assert_eq!(quiz["estimated_time_minutes"], 1);
    assert_eq!(quiz["is_public"], false);
}

#[tokio::test]
async fn test_invalid_questions_rejected() {
    let app = helpers::TestApp::new();
    let user = app.create_test_user("author@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/quizzes",
            Some(json!({ "title": "Empty", "questions": [] })),
            Some(&user),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_duplicate_title_conflicts() {
    let app = helpers::TestApp::new();
    let user = app.create_test_user("author@example.com").await;
    app.create_quiz(&user, "Fractions", None).await;

    let response = app
        .request(
            "POST",
            "/api/quizzes",
            Some(json!({ "title": "Fractions", "questions": [helpers::sample_question()] })),
            Some(&user),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_move_duplicate_and_delete() {
    let app = helpers::TestApp::new();
    let user = app.create_test_user("author@example.com").await;
    let folder = app.create_folder(&user, "Unit 1", None).await;
    let quiz = app.create_quiz(&user, "Fractions", None).await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/quizzes/{quiz}"),
            Some(json!({ "category": "Math", "status": "archived" })),
            Some(&user),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data()["category"], "Math");
    assert_eq!(response.data()["status"], "archived");

    let response = app
        .request(
            "PUT",
            &format!("/api/quizzes/{quiz}/move"),
            Some(json!({ "folder_id": folder })),
            Some(&user),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["folder_id"], folder.as_str());

    let response = app
        .request(
            "POST",
            &format!("/api/quizzes/{quiz}/duplicate"),
            Some(json!({})),
            Some(&user),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.data()["title"], "Fractions (Copy)");
    assert_eq!(response.data()["folder_id"], folder.as_str());

    let response = app
        .request(
            "GET",
            &format!("/api/quizzes?folder_id={folder}"),
            None,
            Some(&user),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["total"], 2);

    let response = app
        .request("DELETE", &format!("/api/quizzes/{quiz}"), None, Some(&user))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("GET", &format!("/api/quizzes/{quiz}"), None, Some(&user))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bulk_reports_per_item() {
    let app = helpers::TestApp::new();
    let user = app.create_test_user("author@example.com").await;
    let other = app.create_test_user("other@example.com").await;
    let mine = app.create_quiz(&user, "Mine", None).await;
    let theirs = app.create_quiz(&other, "Theirs", None).await;

    let response = app
        .request(
            "POST",
            "/api/quizzes/bulk",
            Some(json!({
                "action": "update_tags",
                "quiz_ids": [mine, theirs],
                "data": { "tags": ["review"] },
            })),
            Some(&user),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data()["succeeded"], 1);
    assert_eq!(response.data()["failed"], 1);
    assert_eq!(response.data()["results"][1]["success"], false);

    let response = app
        .request(
            "POST",
            "/api/quizzes/bulk",
            Some(json!({ "action": "delete", "quiz_ids": [] })),
            Some(&user),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
