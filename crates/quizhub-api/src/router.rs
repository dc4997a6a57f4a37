//! Route definitions for the QuizHub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes;
    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    let api_routes = Router::new()
        .merge(health_routes())
        .merge(user_routes())
        .merge(folder_routes())
        .merge(quiz_routes())
        .merge(share_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(middleware::compression::build_compression_layer())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Liveness probe
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Registration and profile
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(handlers::user::register))
        .route("/users/me", get(handlers::user::me))
}

/// Folder CRUD, moves, tree, breadcrumbs, search
fn folder_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/folders",
            get(handlers::folder::list_folders).post(handlers::folder::create_folder),
        )
        .route("/folders/tree", get(handlers::folder::get_tree))
        .route("/folders/search", get(handlers::folder::search_folders))
        .route(
            "/folders/{id}",
            get(handlers::folder::get_folder)
                .patch(handlers::folder::update_folder)
                .delete(handlers::folder::delete_folder),
        )
        .route("/folders/{id}/move", put(handlers::folder::move_folder))
        .route("/folders/{id}/path", get(handlers::folder::get_path))
}

/// Quiz lifecycle, search, bulk
fn quiz_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/quizzes",
            get(handlers::quiz::list_quizzes).post(handlers::quiz::create_quiz),
        )
        .route("/quizzes/bulk", post(handlers::quiz::bulk_operation))
        .route(
            "/quizzes/{id}",
            get(handlers::quiz::get_quiz)
                .patch(handlers::quiz::update_quiz)
                .delete(handlers::quiz::delete_quiz),
        )
        .route("/quizzes/{id}/move", put(handlers::quiz::move_quiz))
        .route("/quizzes/{id}/duplicate", post(handlers::quiz::duplicate_quiz))
}

/// Sharing and collaborators
fn share_routes() -> Router<AppState> {
    Router::new()
        .route("/quizzes/{id}/share", post(handlers::share::share_quiz))
        .route(
            "/quizzes/{id}/collaborators",
            get(handlers::share::list_collaborators).post(handlers::share::add_collaborator),
        )
        .route(
            "/quizzes/{id}/collaborators/{user_id}",
            delete(handlers::share::remove_collaborator),
        )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use quizhub_core::config::AppConfig;
    use quizhub_database::MemoryStore;

    use super::*;

    fn app() -> Router {
        let state = AppState::new(AppConfig::default(), Arc::new(MemoryStore::new()));
        build_router(state)
    }

    async fn call(
        app: &Router,
        method: &str,
        uri: &str,
        caller: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(caller) = caller {
            req = req.header("x-user-id", caller);
        }
        let body = body.map(|b| b.to_string()).unwrap_or_default();
        let response = app
            .clone()
            .oneshot(req.body(Body::from(body)).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn register(app: &Router, email: &str) -> String {
        let (status, body) = call(app, "POST", "/api/users", None, Some(json!({ "email": email }))).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app();
        let (status, body) = call(&app, "GET", "/api/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "ok");
        assert_eq!(body["data"]["database"], "memory");
    }

    #[tokio::test]
    async fn test_missing_caller_is_401() {
        let app = app();
        let (status, body) = call(&app, "GET", "/api/folders", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "AUTHENTICATION_REQUIRED");

        let (status, _) = call(&app, "GET", "/api/folders", Some("not-a-uuid"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_folder_lifecycle() {
        let app = app();
        let user = register(&app, "teacher@example.com").await;

        let (status, body) = call(
            &app,
            "POST",
            "/api/folders",
            Some(&user),
            Some(json!({ "name": "Math" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        let math = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = call(
            &app,
            "POST",
            "/api/folders",
            Some(&user),
            Some(json!({ "name": "Algebra", "parent_id": math })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let algebra = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = call(&app, "GET", "/api/folders/tree", Some(&user), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total_folders"], 2);

        let (status, body) = call(
            &app,
            "GET",
            &format!("/api/folders/{algebra}/path"),
            Some(&user),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["segments"].as_array().unwrap().len(), 2);

        let (status, body) = call(
            &app,
            "POST",
            "/api/folders",
            Some(&user),
            Some(json!({ "name": "Algebra", "parent_id": math })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "BUSINESS_LOGIC_ERROR");

        let (status, body) = call(
            &app,
            "DELETE",
            &format!("/api/folders/{math}"),
            Some(&user),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["subfolders_moved"], 1);
    }

    #[tokio::test]
    async fn test_folders_of_other_users_are_404() {
        let app = app();
        let owner = register(&app, "owner@example.com").await;
        let other = register(&app, "other@example.com").await;

        let (_, body) = call(
            &app,
            "POST",
            "/api/folders",
            Some(&owner),
            Some(json!({ "name": "Private" })),
        )
        .await;
        let folder = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = call(
            &app,
            "GET",
            &format!("/api/folders/{folder}"),
            Some(&other),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_quiz_permission_is_403() {
        let app = app();
        let owner = register(&app, "owner@example.com").await;
        let other = register(&app, "other@example.com").await;

        let (status, body) = call(
            &app,
            "POST",
            "/api/quizzes",
            Some(&owner),
            Some(json!({
                "title": "Fractions",
                "questions": [{
                    "id": "q1",
                    "kind": "true_false",
                    "prompt": "1/2 equals 2/4",
                    "options": ["True", "False"],
                    "correct_answers": [0]
                }]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        let quiz = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = call(
            &app,
            "GET",
            &format!("/api/quizzes/{quiz}"),
            Some(&other),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "UNAUTHORIZED");

        let (status, _) = call(
            &app,
            "GET",
            &format!("/api/quizzes/{quiz}"),
            Some(&owner),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}
