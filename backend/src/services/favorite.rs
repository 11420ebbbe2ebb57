//! Session favorite service

use crate::error::ApiError;
use crate::repositories::{FavoriteRepository, SessionRepository};
use crate::services::session::SessionService;
use flowfit_shared::types::{FavoriteResponse, SessionResponse};
use sqlx::PgPool;
use uuid::Uuid;

/// Favorite service for business logic
pub struct FavoriteService;

impl FavoriteService {
    /// Favorite a session (idempotent). The session must be visible to the
    /// user: their own, or shared with the community.
    pub async fn add(
        pool: &PgPool,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<FavoriteResponse, ApiError> {
        let record = SessionRepository::get_by_id(pool, session_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;

        if !SessionService::is_visible_to(&record, user_id) {
            return Err(ApiError::Forbidden(
                "Session is not shared with you".to_string(),
            ));
        }

        FavoriteRepository::add(pool, user_id, session_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(FavoriteResponse {
            session_id: session_id.to_string(),
            is_favorite: true,
        })
    }

    /// Remove a favorite (idempotent)
    pub async fn remove(
        pool: &PgPool,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<FavoriteResponse, ApiError> {
        FavoriteRepository::remove(pool, user_id, session_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(FavoriteResponse {
            session_id: session_id.to_string(),
            is_favorite: false,
        })
    }

    /// List the user's favorited sessions
    pub async fn list(pool: &PgPool, user_id: Uuid) -> Result<Vec<SessionResponse>, ApiError> {
        let records = FavoriteRepository::list_sessions(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(records
            .into_iter()
            .map(SessionService::record_to_response)
            .collect())
    }
}
