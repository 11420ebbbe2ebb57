//! Session API routes
//!
//! CRUD for workout sessions plus sharing, rating, duration preview and the
//! playback launch payload.

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::services::{RatingService, SessionService};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use flowfit_shared::types::{
    CreateSessionRequest, DurationPreviewRequest, DurationPreviewResponse,
    PlaybackSessionResponse, RateSessionRequest, RatingSummaryResponse, SessionDetailResponse,
    SessionResponse, ShareResponse, SharedSessionsQuery, UpdateSessionRequest,
};
use uuid::Uuid;

/// Create session routes
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_session).get(list_my_sessions))
        .route("/shared", get(list_shared_sessions))
        .route("/preview", post(preview_duration))
        .route(
            "/:id",
            get(get_session).put(update_session).delete(delete_session),
        )
        .route("/:id/share", post(toggle_share))
        .route("/:id/playback", get(get_playback))
        .route("/:id/ratings", post(rate_session))
}

/// POST /api/v1/sessions - Create a session from a draft
async fn create_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateSessionRequest>,
) -> ApiResult<Json<SessionDetailResponse>> {
    let session = SessionService::create(state.db(), auth.user_id, req).await?;
    Ok(Json(session))
}

/// GET /api/v1/sessions - List the authenticated user's sessions
async fn list_my_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<SessionResponse>>> {
    let sessions = SessionService::list_mine(state.db(), auth.user_id).await?;
    Ok(Json(sessions))
}

/// GET /api/v1/sessions/shared - List community sessions
async fn list_shared_sessions(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<SharedSessionsQuery>,
) -> ApiResult<Json<Vec<SessionResponse>>> {
    let sessions = SessionService::list_shared(state.db(), query).await?;
    Ok(Json(sessions))
}

/// POST /api/v1/sessions/preview - Duration preview for a configuration
///
/// Runs the same computation used when sessions are persisted, so the
/// preview always matches the stored duration for identical inputs.
async fn preview_duration(
    _auth: AuthUser,
    Json(req): Json<DurationPreviewRequest>,
) -> ApiResult<Json<DurationPreviewResponse>> {
    let preview = SessionService::preview_duration(&req)?;
    Ok(Json(preview))
}

/// GET /api/v1/sessions/:id - Get one session with entries
async fn get_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<SessionDetailResponse>> {
    let id = parse_uuid(&id)?;
    let session = SessionService::get(state.db(), auth.user_id, id).await?;
    Ok(Json(session))
}

/// PUT /api/v1/sessions/:id - Update a session (owner only)
async fn update_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateSessionRequest>,
) -> ApiResult<Json<SessionDetailResponse>> {
    let id = parse_uuid(&id)?;
    let session = SessionService::update(state.db(), auth.user_id, id, req).await?;
    Ok(Json(session))
}

/// DELETE /api/v1/sessions/:id - Delete a session (owner only)
async fn delete_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let id = parse_uuid(&id)?;
    SessionService::delete(state.db(), auth.user_id, id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// POST /api/v1/sessions/:id/share - Toggle community sharing (owner only)
async fn toggle_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ShareResponse>> {
    let id = parse_uuid(&id)?;
    let share = SessionService::toggle_share(state.db(), auth.user_id, id).await?;
    Ok(Json(share))
}

/// GET /api/v1/sessions/:id/playback - Playback launch payload
async fn get_playback(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<PlaybackSessionResponse>> {
    let id = parse_uuid(&id)?;
    let playback = SessionService::playback(state.db(), auth.user_id, id).await?;
    Ok(Json(playback))
}

/// POST /api/v1/sessions/:id/ratings - Rate a session 1-5
async fn rate_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<RateSessionRequest>,
) -> ApiResult<Json<RatingSummaryResponse>> {
    let id = parse_uuid(&id)?;
    let summary = RatingService::rate(state.db(), auth.user_id, id, req.rating).await?;
    Ok(Json(summary))
}

fn parse_uuid(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid id: {}", raw)))
}
