//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use quizhub_api::{AppState, build_app};
use quizhub_core::config::AppConfig;
use quizhub_database::MemoryStore;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application on a fresh in-memory store
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a test application with custom configuration
    pub fn with_config(config: AppConfig) -> Self {
        let state = AppState::new(config.clone(), Arc::new(MemoryStore::new()));
        Self {
            router: build_app(state),
            config,
        }
    }

    /// Register a user and return their ID as a header value
    pub async fn create_test_user(&self, email: &str) -> String {
        let response = self
            .request("POST", "/api/users", Some(json!({ "email": email })), None)
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Registration failed: {:?}",
            response.body
        );
        response.id()
    }

    /// Create a folder and return its ID
    pub async fn create_folder(&self, user: &str, name: &str, parent: Option<&str>) -> String {
        let response = self
            .request(
                "POST",
                "/api/folders",
                Some(json!({ "name": name, "parent_id": parent })),
                Some(user),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Folder creation failed: {:?}",
            response.body
        );
        response.id()
    }

    /// Create a one-question quiz and return its ID
    pub async fn create_quiz(&self, user: &str, title: &str, folder: Option<&str>) -> String {
        let response = self
            .request(
                "POST",
                "/api/quizzes",
                Some(json!({
                    "title": title,
                    "folder_id": folder,
                    "questions": [sample_question()],
                })),
                Some(user),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Quiz creation failed: {:?}",
            response.body
        );
        response.id()
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        user: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(user) = user {
            req = req.header("X-User-Id", user);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// A multiple-choice question accepted by the structural validator
pub fn sample_question() -> Value {
    json!({
        "id": "q1",
        "kind": "multiple_choice",
        "prompt": "What is 6 x 7?",
        "options": ["42", "36", "48"],
        "correct_answers": [0],
    })
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `data` payload
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The `data.id` field as a string
    pub fn id(&self) -> String {
        self.data()["id"]
            .as_str()
            .expect("No id in response")
            .to_string()
    }

    /// The error code of a failed request
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}
