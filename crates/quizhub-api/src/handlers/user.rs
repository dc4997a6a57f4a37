//! User registration and self-service handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::request::{RegisterUserBody, validate};
use crate::dto::response::{ApiResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::Caller;
use crate::state::AppState;

/// POST /api/users
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterUserBody>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    validate(&req)?;
    let user = state.user_service.register(req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user.into()))))
}

/// GET /api/users/me
pub async fn me(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state.user_service.me(&caller).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}
