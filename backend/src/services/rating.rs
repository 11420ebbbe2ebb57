//! Session rating service
//!
//! One rating per (user, session), upserted. After every write the session
//! aggregate is recomputed from the full rating set; the mean is re-read,
//! never maintained incrementally.

use crate::error::ApiError;
use crate::repositories::{RatingRepository, SessionRepository};
use crate::services::SessionService;
use flowfit_shared::types::RatingSummaryResponse;
use flowfit_shared::validation::validate_rating;
use sqlx::PgPool;
use uuid::Uuid;

/// Rating service for business logic
pub struct RatingService;

impl RatingService {
    /// Rate a session 1-5, upserting the caller's previous rating, and
    /// return the recomputed aggregate
    pub async fn rate(
        pool: &PgPool,
        user_id: Uuid,
        session_id: Uuid,
        rating: u8,
    ) -> Result<RatingSummaryResponse, ApiError> {
        validate_rating(rating).map_err(ApiError::Validation)?;

        let record = SessionRepository::get_by_id(pool, session_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;

        if !SessionService::is_visible_to(&record, user_id) {
            return Err(ApiError::Forbidden(
                "Session is not shared with you".to_string(),
            ));
        }

        RatingRepository::upsert(pool, session_id, user_id, rating as i32)
            .await
            .map_err(ApiError::Internal)?;

        // Recompute from every stored rating for this session
        let values = RatingRepository::get_values(pool, session_id)
            .await
            .map_err(ApiError::Internal)?;
        let (mean, count) = Self::compute_mean(&values);

        SessionRepository::update_rating(pool, session_id, mean, count)
            .await
            .map_err(ApiError::Internal)?;

        Ok(RatingSummaryResponse {
            session_id: session_id.to_string(),
            rating: mean,
            rating_count: count,
        })
    }

    /// Arithmetic mean and count of a rating set; (0, 0) when empty
    fn compute_mean(values: &[i32]) -> (f64, i32) {
        if values.is_empty() {
            return (0.0, 0);
        }
        let sum: i32 = values.iter().sum();
        (f64::from(sum) / values.len() as f64, values.len() as i32)
    }
}
