//! Integration tests for the folder hierarchy endpoints.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_depth_limit_rejects_folder_below_depth_five() {
    let app = helpers::TestApp::new();
    let user = app.create_test_user("depth@example.com").await;

    let mut parent: Option<String> = None;
    for level in 0..=5 {
        let id = app
            .create_folder(&user, &format!("Level {level}"), parent.as_deref())
            .await;
        parent = Some(id);
    }

    let response = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "name": "Too deep", "parent_id": parent })),
            Some(&user),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "BUSINESS_LOGIC_ERROR");
}

#[tokio::test]
async fn test_move_into_descendant_rejected() {
    let app = helpers::TestApp::new();
    let user = app.create_test_user("cycle@example.com").await;
    let a = app.create_folder(&user, "A", None).await;
    let b = app.create_folder(&user, "B", Some(&a)).await;

    let response = app
        .request(
            "PUT",
            &format!("/api/folders/{a}/move"),
            Some(json!({ "new_parent_id": b })),
            Some(&user),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = app
        .request(
            "PUT",
            &format!("/api/folders/{b}/move"),
            Some(json!({ "new_parent_id": null })),
            Some(&user),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.data()["parent_id"].is_null());
}

#[tokio::test]
async fn test_rename_and_search() {
    let app = helpers::TestApp::new();
    let user = app.create_test_user("rename@example.com").await;
    let folder = app.create_folder(&user, "Scratch", None).await;
    app.create_folder(&user, "Geometry", None).await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/folders/{folder}"),
            Some(json!({ "name": "Geography" })),
            Some(&user),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["name"], "Geography");

    let response = app
        .request("GET", "/api/folders/search?q=geo", None, Some(&user))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["total"], 2);
}

#[tokio::test]
async fn test_delete_folder_with_contents() {
    let app = helpers::TestApp::new();
    let user = app.create_test_user("cascade@example.com").await;
    let parent = app.create_folder(&user, "Parent", None).await;
    let child = app.create_folder(&user, "Child", Some(&parent)).await;
    app.create_quiz(&user, "Inside child", Some(&child)).await;

    let response = app
        .request(
            "DELETE",
            &format!(
                "/api/folders/{parent}?move_quizzes_to_parent=false&move_subfolders_to_parent=false"
            ),
            None,
            Some(&user),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data()["folders_deleted"], 2);
    assert_eq!(response.data()["quizzes_deleted"], 1);

    let response = app
        .request("GET", &format!("/api/folders/{child}"), None, Some(&user))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
