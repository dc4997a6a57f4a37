//! Folder CRUD, tree, and search handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use quizhub_core::types::FolderId;
use quizhub_entity::folder::{Folder, FolderPath, FolderTree};
use quizhub_service::folder::{DeleteFolderOutcome, UpdateFolderRequest};

use crate::dto::request::{
    CreateFolderBody, DeleteFolderQuery, FolderTreeQuery, ListFoldersQuery, MoveFolderBody,
    SearchQuery, validate,
};
use crate::dto::response::{ApiResponse, PaginatedResponse};
use crate::error::ApiError;
use crate::extractors::{Caller, PaginationParams};
use crate::state::AppState;

/// GET /api/folders?parent_id=...
pub async fn list_folders(
    State(state): State<AppState>,
    caller: Caller,
    Query(params): Query<ListFoldersQuery>,
) -> Result<Json<ApiResponse<Vec<Folder>>>, ApiError> {
    let folders = state
        .folder_service
        .list_children(&caller, params.parent_id)
        .await?;
    Ok(Json(ApiResponse::ok(folders)))
}

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<CreateFolderBody>,
) -> Result<(StatusCode, Json<ApiResponse<Folder>>), ApiError> {
    validate(&req)?;
    let folder = state.folder_service.create_folder(&caller, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(folder))))
}

/// GET /api/folders/tree?root_id=...
pub async fn get_tree(
    State(state): State<AppState>,
    caller: Caller,
    Query(params): Query<FolderTreeQuery>,
) -> Result<Json<ApiResponse<FolderTree>>, ApiError> {
    let tree = state.tree_service.get_tree(&caller, params.root_id).await?;
    Ok(Json(ApiResponse::ok(tree)))
}

/// GET /api/folders/search?q=...
pub async fn search_folders(
    State(state): State<AppState>,
    caller: Caller,
    Query(search): Query<SearchQuery>,
    Query(page): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<Folder>>>, ApiError> {
    validate(&search)?;
    let result = state
        .folder_service
        .search_folders(&caller, &search.q, page.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(result.into())))
}

/// GET /api/folders/{id}
pub async fn get_folder(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<FolderId>,
) -> Result<Json<ApiResponse<Folder>>, ApiError> {
    let folder = state.folder_service.get_folder(&caller, id).await?;
    Ok(Json(ApiResponse::ok(folder)))
}

/// GET /api/folders/{id}/path
pub async fn get_path(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<FolderId>,
) -> Result<Json<ApiResponse<FolderPath>>, ApiError> {
    let path = state.tree_service.get_path(&caller, id).await?;
    Ok(Json(ApiResponse::ok(path)))
}

/// PATCH /api/folders/{id}
pub async fn update_folder(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<FolderId>,
    Json(req): Json<UpdateFolderRequest>,
) -> Result<Json<ApiResponse<Folder>>, ApiError> {
    let folder = state.folder_service.update_folder(&caller, id, req).await?;
    Ok(Json(ApiResponse::ok(folder)))
}

/// PUT /api/folders/{id}/move
pub async fn move_folder(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<FolderId>,
    Json(req): Json<MoveFolderBody>,
) -> Result<Json<ApiResponse<Folder>>, ApiError> {
    let folder = state
        .folder_service
        .move_folder(&caller, id, req.new_parent_id)
        .await?;
    Ok(Json(ApiResponse::ok(folder)))
}

/// DELETE /api/folders/{id}
pub async fn delete_folder(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<FolderId>,
    Query(params): Query<DeleteFolderQuery>,
) -> Result<Json<ApiResponse<DeleteFolderOutcome>>, ApiError> {
    let outcome = state
        .folder_service
        .delete_folder(&caller, id, params.into())
        .await?;
    Ok(Json(ApiResponse::ok(outcome)))
}
