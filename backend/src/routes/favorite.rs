//! Favorite API routes

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::services::FavoriteService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use flowfit_shared::types::{FavoriteResponse, SessionResponse};
use uuid::Uuid;

/// Create favorite routes
pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_favorites))
        .route("/:session_id", put(add_favorite).delete(remove_favorite))
}

/// GET /api/v1/favorites - List the user's favorited sessions
async fn list_favorites(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<SessionResponse>>> {
    let sessions = FavoriteService::list(state.db(), auth.user_id).await?;
    Ok(Json(sessions))
}

/// PUT /api/v1/favorites/:session_id - Favorite a session (idempotent)
async fn add_favorite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<String>,
) -> ApiResult<Json<FavoriteResponse>> {
    let session_id = parse_uuid(&session_id)?;
    let favorite = FavoriteService::add(state.db(), auth.user_id, session_id).await?;
    Ok(Json(favorite))
}

/// DELETE /api/v1/favorites/:session_id - Remove a favorite (idempotent)
async fn remove_favorite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<String>,
) -> ApiResult<Json<FavoriteResponse>> {
    let session_id = parse_uuid(&session_id)?;
    let favorite = FavoriteService::remove(state.db(), auth.user_id, session_id).await?;
    Ok(Json(favorite))
}

fn parse_uuid(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid id: {}", raw)))
}
