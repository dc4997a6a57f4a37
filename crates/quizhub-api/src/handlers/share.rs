//! Sharing and collaborator handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use quizhub_core::types::{QuizId, UserId};
use quizhub_entity::collaborator::{CollaboratorGrant, CollaboratorPermission};
use quizhub_service::share::{AddCollaboratorRequest, ShareQuizRequest, ShareQuizResult};

use crate::dto::request::{ShareQuizBody, validate};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::Caller;
use crate::state::AppState;

/// POST /api/quizzes/{id}/share
pub async fn share_quiz(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<QuizId>,
    Json(req): Json<ShareQuizBody>,
) -> Result<Json<ApiResponse<ShareQuizResult>>, ApiError> {
    validate(&req)?;
    let result = state
        .share_service
        .share_quiz(
            &caller,
            id,
            ShareQuizRequest {
                emails: req.emails,
                permission: req.permission.unwrap_or(CollaboratorPermission::View),
                message: req.message,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/quizzes/{id}/collaborators
pub async fn list_collaborators(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<QuizId>,
) -> Result<Json<ApiResponse<Vec<CollaboratorGrant>>>, ApiError> {
    let grants = state
        .collaborator_service
        .list_collaborators(&caller, id)
        .await?;
    Ok(Json(ApiResponse::ok(grants)))
}

/// POST /api/quizzes/{id}/collaborators
pub async fn add_collaborator(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<QuizId>,
    Json(req): Json<AddCollaboratorRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CollaboratorGrant>>), ApiError> {
    let grant = state
        .collaborator_service
        .add_collaborator(&caller, id, req)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(grant))))
}

/// DELETE /api/quizzes/{id}/collaborators/{user_id}
pub async fn remove_collaborator(
    State(state): State<AppState>,
    caller: Caller,
    Path((id, user_id)): Path<(QuizId, UserId)>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .collaborator_service
        .remove_collaborator(&caller, id, user_id)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Collaborator removed"))))
}
