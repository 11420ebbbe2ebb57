//! Exercise catalog service
//!
//! Read-only access to the curated exercise catalog.

use crate::error::ApiError;
use crate::repositories::{ExerciseRecord, ExerciseRepository};
use flowfit_shared::models::Category;
use flowfit_shared::types::ExerciseResponse;
use sqlx::PgPool;
use std::str::FromStr;
use uuid::Uuid;

const DEFAULT_SEARCH_LIMIT: i64 = 20;
const MAX_SEARCH_LIMIT: i64 = 100;

/// Exercise catalog service
pub struct ExerciseService;

impl ExerciseService {
    /// List catalog exercises, optionally filtered by category
    pub async fn list(
        pool: &PgPool,
        category: Option<&str>,
    ) -> Result<Vec<ExerciseResponse>, ApiError> {
        // Reject unknown categories up front instead of returning an empty list
        let category = category
            .map(|raw| Category::from_str(raw).map_err(ApiError::BadRequest))
            .transpose()?;

        let records = ExerciseRepository::get_all(pool, category.map(|c| c.as_str()))
            .await
            .map_err(ApiError::Internal)?;

        Ok(records.into_iter().map(Self::record_to_response).collect())
    }

    /// Search exercises by name
    pub async fn search(
        pool: &PgPool,
        query: &str,
        limit: Option<i64>,
    ) -> Result<Vec<ExerciseResponse>, ApiError> {
        if query.trim().is_empty() {
            return Err(ApiError::BadRequest("Search query cannot be empty".to_string()));
        }
        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT).clamp(1, MAX_SEARCH_LIMIT);

        let records = ExerciseRepository::search(pool, query.trim(), limit)
            .await
            .map_err(ApiError::Internal)?;

        Ok(records.into_iter().map(Self::record_to_response).collect())
    }

    /// Get one exercise by ID
    pub async fn get(pool: &PgPool, id: Uuid) -> Result<ExerciseResponse, ApiError> {
        let record = ExerciseRepository::get_by_id(pool, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Exercise not found".to_string()))?;

        Ok(Self::record_to_response(record))
    }

    /// Convert database record to response
    fn record_to_response(record: ExerciseRecord) -> ExerciseResponse {
        ExerciseResponse {
            id: record.id.to_string(),
            name: record.name,
            description: record.description,
            category: record.category,
            subcategory: record.subcategory,
            image: record.image,
        }
    }
}
