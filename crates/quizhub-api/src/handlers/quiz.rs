//! Quiz lifecycle, search, and bulk handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use quizhub_core::types::QuizId;
use quizhub_entity::quiz::Quiz;
use quizhub_service::quiz::{
    BulkOperationRequest, BulkOperationResult, CreateQuizRequest, UpdateQuizRequest,
};

use crate::dto::request::{
    DeleteQuizQuery, DuplicateQuizBody, ListQuizzesQuery, MoveQuizBody, validate,
};
use crate::dto::response::{ApiResponse, MessageResponse, PaginatedResponse};
use crate::error::ApiError;
use crate::extractors::{Caller, PaginationParams};
use crate::state::AppState;

/// GET /api/quizzes?q=&folder_id=&top_level=&tag=&category=&status=
pub async fn list_quizzes(
    State(state): State<AppState>,
    caller: Caller,
    Query(params): Query<ListQuizzesQuery>,
    Query(page): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<Quiz>>>, ApiError> {
    validate(&params)?;
    let result = state
        .quiz_service
        .search_quizzes(&caller, params.into_search()?, page.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(result.into())))
}

/// POST /api/quizzes
pub async fn create_quiz(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<CreateQuizRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Quiz>>), ApiError> {
    let quiz = state.quiz_service.create_quiz(&caller, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(quiz))))
}

/// GET /api/quizzes/{id}
pub async fn get_quiz(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<QuizId>,
) -> Result<Json<ApiResponse<Quiz>>, ApiError> {
    let quiz = state.quiz_service.get_quiz(&caller, id).await?;
    Ok(Json(ApiResponse::ok(quiz)))
}

/// PATCH /api/quizzes/{id}
pub async fn update_quiz(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<QuizId>,
    Json(req): Json<UpdateQuizRequest>,
) -> Result<Json<ApiResponse<Quiz>>, ApiError> {
    let quiz = state.quiz_service.update_quiz(&caller, id, req).await?;
    Ok(Json(ApiResponse::ok(quiz)))
}

/// DELETE /api/quizzes/{id}?permanent=true
pub async fn delete_quiz(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<QuizId>,
    Query(params): Query<DeleteQuizQuery>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .quiz_service
        .delete_quiz(&caller, id, params.permanent)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Quiz deleted"))))
}

/// PUT /api/quizzes/{id}/move
pub async fn move_quiz(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<QuizId>,
    Json(req): Json<MoveQuizBody>,
) -> Result<Json<ApiResponse<Quiz>>, ApiError> {
    let quiz = state.quiz_service.move_quiz(&caller, id, req.folder_id).await?;
    Ok(Json(ApiResponse::ok(quiz)))
}

/// POST /api/quizzes/{id}/duplicate
pub async fn duplicate_quiz(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<QuizId>,
    Json(req): Json<DuplicateQuizBody>,
) -> Result<(StatusCode, Json<ApiResponse<Quiz>>), ApiError> {
    validate(&req)?;
    let quiz = state
        .quiz_service
        .duplicate_quiz(&caller, id, req.title)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(quiz))))
}

/// POST /api/quizzes/bulk
pub async fn bulk_operation(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<BulkOperationRequest>,
) -> Result<Json<ApiResponse<BulkOperationResult>>, ApiError> {
    let result = state.bulk_service.bulk_operation(&caller, req).await?;
    Ok(Json(ApiResponse::ok(result)))
}
