//! Exercise catalog API routes

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::services::ExerciseService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use flowfit_shared::types::{ExerciseListQuery, ExerciseResponse, ExerciseSearchQuery};
use uuid::Uuid;

/// Create exercise catalog routes
pub fn exercise_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_exercises))
        .route("/search", get(search_exercises))
        .route("/:id", get(get_exercise))
}

/// GET /api/v1/exercises - List the catalog, optionally filtered by category
async fn list_exercises(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ExerciseListQuery>,
) -> ApiResult<Json<Vec<ExerciseResponse>>> {
    let exercises = ExerciseService::list(state.db(), query.category.as_deref()).await?;
    Ok(Json(exercises))
}

/// GET /api/v1/exercises/search?q= - Search exercises by name
async fn search_exercises(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ExerciseSearchQuery>,
) -> ApiResult<Json<Vec<ExerciseResponse>>> {
    let exercises = ExerciseService::search(state.db(), &query.q, query.limit).await?;
    Ok(Json(exercises))
}

/// GET /api/v1/exercises/:id - Get one exercise
async fn get_exercise(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ExerciseResponse>> {
    let id = parse_uuid(&id)?;
    let exercise = ExerciseService::get(state.db(), id).await?;
    Ok(Json(exercise))
}

fn parse_uuid(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid id: {}", raw)))
}
