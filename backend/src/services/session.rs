//! Session service
//!
//! Create, read, update, delete and share workout sessions. Every path that
//! can change a session's exercises or rest time funnels through the shared
//! composer: drafts are validated with `validate_for_submission`, so the
//! persisted duration is always the one `compute_total_duration` yields for
//! the current entry list, identical to what the client previews.

use crate::error::ApiError;
use crate::repositories::{
    CreateSession, CreateSessionEntry, ExerciseRepository, SessionEntryRecord, SessionRecord,
    SessionRepository, UpdateSession,
};
use flowfit_shared::composer::compute_total_duration;
use flowfit_shared::models::{Category, Difficulty, SessionDraft, ValidSession};
use flowfit_shared::playback::COUNTDOWN_SECS;
use flowfit_shared::types::{
    CreateSessionRequest, DurationPreviewRequest, DurationPreviewResponse, PlaybackEntryResponse,
    PlaybackSessionResponse, SessionDetailResponse, SessionEntryResponse, SessionExerciseInput,
    SessionResponse, ShareResponse, SharedSessionsQuery, UpdateSessionRequest,
};
use flowfit_shared::validation::{
    validate_exercise_duration, validate_rest_time, validate_session_name,
};
use sqlx::PgPool;
use std::collections::HashSet;
use std::str::FromStr;
use uuid::Uuid;

/// Session service for business logic
pub struct SessionService;

impl SessionService {
    /// Create a session from a draft request
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        request: CreateSessionRequest,
    ) -> Result<SessionDetailResponse, ApiError> {
        let draft = Self::assemble_draft(
            request.name,
            request.description,
            Some(request.category),
            Some(request.difficulty),
            Some(request.rest_time_secs),
            &request.exercises,
        )?;
        let valid = draft.validate_for_submission()?;

        Self::ensure_exercises_exist(pool, &valid).await?;

        let record = SessionRepository::create(pool, Self::to_create_input(&valid, user_id))
            .await
            .map_err(ApiError::Internal)?;

        Self::detail(pool, record).await
    }

    /// Get one session with its entries (owner or shared)
    pub async fn get(
        pool: &PgPool,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<SessionDetailResponse, ApiError> {
        let record = Self::get_visible(pool, user_id, session_id).await?;
        Self::detail(pool, record).await
    }

    /// List the user's own sessions
    pub async fn list_mine(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<SessionResponse>, ApiError> {
        let records = SessionRepository::list_by_owner(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(records.into_iter().map(Self::record_to_response).collect())
    }

    /// List community (shared) sessions with optional filters
    pub async fn list_shared(
        pool: &PgPool,
        query: SharedSessionsQuery,
    ) -> Result<Vec<SessionResponse>, ApiError> {
        let query = query.normalize();

        let category = query
            .category
            .as_deref()
            .map(|raw| Category::from_str(raw).map_err(ApiError::BadRequest))
            .transpose()?;
        let difficulty = query
            .difficulty
            .as_deref()
            .map(|raw| Difficulty::from_str(raw).map_err(ApiError::BadRequest))
            .transpose()?;

        let records = SessionRepository::list_shared(
            pool,
            category.map(|c| c.as_str()),
            difficulty.map(|d| d.as_str()),
            query.limit.unwrap_or(50),
            query.offset.unwrap_or(0),
        )
        .await
        .map_err(ApiError::Internal)?;

        Ok(records.into_iter().map(Self::record_to_response).collect())
    }

    /// Update a session (owner only). When the exercise list or rest time
    /// changes, the stored duration is recomputed through the composer.
    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        session_id: Uuid,
        request: UpdateSessionRequest,
    ) -> Result<SessionDetailResponse, ApiError> {
        let record = Self::get_owned(pool, user_id, session_id).await?;

        // Merge the patch over the stored session, then re-validate the
        // whole thing as a draft: one validation and one duration path for
        // both create and update.
        let entries_patch;
        let stored_entries;
        let entry_inputs: &[SessionExerciseInput] = match request.exercises {
            Some(exercises) => {
                entries_patch = exercises;
                &entries_patch
            }
            None => {
                stored_entries = SessionRepository::get_entries(pool, session_id)
                    .await
                    .map_err(ApiError::Internal)?
                    .into_iter()
                    .map(|entry| SessionExerciseInput {
                        exercise_id: entry.exercise_id,
                        duration_secs: Some(entry.duration_secs as u32),
                    })
                    .collect::<Vec<_>>();
                &stored_entries
            }
        };

        let category = match request.category {
            Some(category) => category,
            None => Self::parse_category(&record)?,
        };
        let difficulty = match request.difficulty {
            Some(difficulty) => difficulty,
            None => Self::parse_difficulty(&record)?,
        };

        let draft = Self::assemble_draft(
            request.name.unwrap_or(record.name),
            request.description.or(record.description),
            Some(category),
            Some(difficulty),
            Some(
                request
                    .rest_time_secs
                    .unwrap_or(record.rest_time_secs as u32),
            ),
            entry_inputs,
        )?;
        let valid = draft.validate_for_submission()?;

        Self::ensure_exercises_exist(pool, &valid).await?;

        let updated = SessionRepository::update(
            pool,
            session_id,
            UpdateSession {
                name: valid.name.clone(),
                description: valid.description.clone(),
                category: valid.category.as_str().to_string(),
                difficulty: valid.difficulty.as_str().to_string(),
                rest_time_secs: valid.rest_time_secs as i32,
                duration_secs: valid.duration_secs as i32,
                entries: Some(Self::to_entry_inputs(&valid)),
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        Self::detail(pool, updated).await
    }

    /// Delete a session (owner only)
    pub async fn delete(
        pool: &PgPool,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<(), ApiError> {
        Self::get_owned(pool, user_id, session_id).await?;

        SessionRepository::delete(pool, session_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(())
    }

    /// Toggle community sharing (owner only)
    pub async fn toggle_share(
        pool: &PgPool,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<ShareResponse, ApiError> {
        let record = Self::get_owned(pool, user_id, session_id).await?;
        let is_shared = !record.is_shared;

        SessionRepository::set_shared(pool, session_id, is_shared)
            .await
            .map_err(ApiError::Internal)?;

        Ok(ShareResponse {
            id: session_id.to_string(),
            is_shared,
        })
    }

    /// Compute a duration preview for a playback configuration.
    ///
    /// Same pure function as create/update, so the preview the client shows
    /// always equals the duration the store would persist.
    pub fn preview_duration(
        request: &DurationPreviewRequest,
    ) -> Result<DurationPreviewResponse, ApiError> {
        validate_rest_time(request.rest_time_secs).map_err(ApiError::Validation)?;
        for duration in &request.durations {
            validate_exercise_duration(*duration).map_err(ApiError::Validation)?;
        }

        Ok(DurationPreviewResponse {
            duration_secs: compute_total_duration(&request.durations, request.rest_time_secs),
        })
    }

    /// Build the playback launch payload for a session (owner or shared)
    pub async fn playback(
        pool: &PgPool,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<PlaybackSessionResponse, ApiError> {
        let record = Self::get_visible(pool, user_id, session_id).await?;
        let entries = SessionRepository::get_entries(pool, session_id)
            .await
            .map_err(ApiError::Internal)?;

        if entries.is_empty() {
            // Submission validation makes this unreachable for stored
            // sessions, but a playback payload must never be empty
            return Err(ApiError::Conflict(
                "Session has no exercises to play".to_string(),
            ));
        }

        Ok(PlaybackSessionResponse {
            session_id: record.id.to_string(),
            rest_time_secs: record.rest_time_secs as u32,
            countdown_secs: COUNTDOWN_SECS,
            entries: entries
                .into_iter()
                .map(|entry| PlaybackEntryResponse {
                    exercise_id: entry.exercise_id.to_string(),
                    exercise_name: entry.exercise_name,
                    order: entry.position as u32,
                    duration_secs: entry.duration_secs as u32,
                })
                .collect(),
        })
    }

    // ── Access checks ────────────────────────────────────────────────

    /// Fetch a session the user may read: their own, or a shared one
    async fn get_visible(
        pool: &PgPool,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<SessionRecord, ApiError> {
        let record = SessionRepository::get_by_id(pool, session_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;

        if !Self::is_visible_to(&record, user_id) {
            return Err(ApiError::Forbidden(
                "Session is not shared with you".to_string(),
            ));
        }
        Ok(record)
    }

    /// Fetch a session the user may mutate: theirs only
    async fn get_owned(
        pool: &PgPool,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<SessionRecord, ApiError> {
        let record = SessionRepository::get_by_id(pool, session_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;

        if record.created_by != Some(user_id) {
            return Err(ApiError::Forbidden(
                "Only the session owner can do this".to_string(),
            ));
        }
        Ok(record)
    }

    pub(crate) fn is_visible_to(record: &SessionRecord, user_id: Uuid) -> bool {
        record.is_shared || record.created_by == Some(user_id)
    }

    // ── Draft assembly and mapping ───────────────────────────────────

    /// Build a draft from request parts, running each entry through the
    /// composer so ordering, duplicate and duration rules apply uniformly
    fn assemble_draft(
        name: String,
        description: Option<String>,
        category: Option<Category>,
        difficulty: Option<Difficulty>,
        rest_time_secs: Option<u32>,
        exercises: &[SessionExerciseInput],
    ) -> Result<SessionDraft, ApiError> {
        // An absent name is the composer's MissingField; only bound the
        // length of one that was actually provided
        if !name.trim().is_empty() {
            validate_session_name(&name).map_err(ApiError::Validation)?;
        }

        let mut draft = SessionDraft {
            name,
            description,
            category,
            difficulty,
            rest_time_secs,
            ..Default::default()
        };

        for (index, input) in exercises.iter().enumerate() {
            draft.add_exercise(input.exercise_id)?;
            if let Some(duration_secs) = input.duration_secs {
                validate_exercise_duration(duration_secs).map_err(ApiError::Validation)?;
                draft.set_exercise_duration(index, duration_secs)?;
            }
        }

        Ok(draft)
    }

    /// Check that every referenced exercise exists in the catalog
    async fn ensure_exercises_exist(
        pool: &PgPool,
        valid: &ValidSession,
    ) -> Result<(), ApiError> {
        let ids: Vec<Uuid> = valid.entries.iter().map(|e| e.exercise_id).collect();
        let found: HashSet<Uuid> = ExerciseRepository::get_by_ids(pool, &ids)
            .await
            .map_err(ApiError::Internal)?
            .into_iter()
            .map(|record| record.id)
            .collect();

        for id in &ids {
            if !found.contains(id) {
                return Err(ApiError::NotFound(format!("Exercise {} not found", id)));
            }
        }
        Ok(())
    }

    fn to_create_input(valid: &ValidSession, user_id: Uuid) -> CreateSession {
        CreateSession {
            name: valid.name.clone(),
            description: valid.description.clone(),
            category: valid.category.as_str().to_string(),
            difficulty: valid.difficulty.as_str().to_string(),
            rest_time_secs: valid.rest_time_secs as i32,
            duration_secs: valid.duration_secs as i32,
            created_by: Some(user_id),
            entries: Self::to_entry_inputs(valid),
        }
    }

    fn to_entry_inputs(valid: &ValidSession) -> Vec<CreateSessionEntry> {
        valid
            .entries
            .iter()
            .map(|entry| CreateSessionEntry {
                exercise_id: entry.exercise_id,
                position: entry.order as i32,
                duration_secs: entry.duration_secs as i32,
            })
            .collect()
    }

    async fn detail(
        pool: &PgPool,
        record: SessionRecord,
    ) -> Result<SessionDetailResponse, ApiError> {
        let entries = SessionRepository::get_entries(pool, record.id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(SessionDetailResponse {
            session: Self::record_to_response(record),
            entries: entries.into_iter().map(Self::entry_to_response).collect(),
        })
    }

    fn entry_to_response(entry: SessionEntryRecord) -> SessionEntryResponse {
        SessionEntryResponse {
            exercise_id: entry.exercise_id.to_string(),
            exercise_name: entry.exercise_name,
            order: entry.position as u32,
            duration_secs: entry.duration_secs as u32,
        }
    }

    fn parse_category(record: &SessionRecord) -> Result<Category, ApiError> {
        Category::from_str(&record.category)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("Corrupt category: {}", e)))
    }

    fn parse_difficulty(record: &SessionRecord) -> Result<Difficulty, ApiError> {
        Difficulty::from_str(&record.difficulty)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("Corrupt difficulty: {}", e)))
    }

    /// Convert database record to response
    pub(crate) fn record_to_response(record: SessionRecord) -> SessionResponse {
        SessionResponse {
            id: record.id.to_string(),
            name: record.name,
            description: record.description,
            category: record.category,
            difficulty: record.difficulty,
            rest_time_secs: record.rest_time_secs as u32,
            duration_secs: record.duration_secs as u32,
            rating: record.rating,
            rating_count: record.rating_count,
            is_shared: record.is_shared,
            created_by: record.created_by.map(|id| id.to_string()),
            exercise_count: record.exercise_count,
            created_at: record.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use flowfit_shared::errors::ComposerError;

    fn record(created_by: Option<Uuid>, is_shared: bool) -> SessionRecord {
        SessionRecord {
            id: Uuid::new_v4(),
            name: "Push day".to_string(),
            description: None,
            category: "musculation".to_string(),
            difficulty: "moyen".to_string(),
            rest_time_secs: 10,
            duration_secs: 115,
            rating: 0.0,
            rating_count: 0,
            is_shared,
            created_by,
            exercise_count: 3,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_visibility_owner_and_shared() {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        let private = record(Some(owner), false);
        assert!(SessionService::is_visible_to(&private, owner));
        assert!(!SessionService::is_visible_to(&private, stranger));

        let shared = record(Some(owner), true);
        assert!(SessionService::is_visible_to(&shared, stranger));
    }

    #[test]
    fn test_assemble_draft_orders_and_durations() {
        let inputs = vec![
            SessionExerciseInput {
                exercise_id: Uuid::new_v4(),
                duration_secs: Some(45),
            },
            SessionExerciseInput {
                exercise_id: Uuid::new_v4(),
                duration_secs: None,
            },
        ];
        let draft = SessionService::assemble_draft(
            "Push day".to_string(),
            None,
            Some(Category::Musculation),
            Some(Difficulty::Moyen),
            Some(10),
            &inputs,
        )
        .unwrap();

        assert_eq!(draft.entries[0].order, 1);
        assert_eq!(draft.entries[0].duration_secs, 45);
        assert_eq!(draft.entries[1].order, 2);
        // Unspecified duration falls back to the composer default
        assert_eq!(draft.entries[1].duration_secs, 30);
    }

    #[test]
    fn test_assemble_draft_rejects_duplicates() {
        let id = Uuid::new_v4();
        let inputs = vec![
            SessionExerciseInput {
                exercise_id: id,
                duration_secs: None,
            },
            SessionExerciseInput {
                exercise_id: id,
                duration_secs: None,
            },
        ];
        let result = SessionService::assemble_draft(
            "Dup".to_string(),
            None,
            Some(Category::Yoga),
            Some(Difficulty::Facile),
            Some(5),
            &inputs,
        );
        assert!(matches!(
            result,
            Err(ApiError::Composer(ComposerError::DuplicateExercise(_)))
        ));
    }

    #[test]
    fn test_preview_duration_matches_formula() {
        let response = SessionService::preview_duration(&DurationPreviewRequest {
            durations: vec![30, 45, 20],
            rest_time_secs: 10,
        })
        .unwrap();
        assert_eq!(response.duration_secs, 115);
    }

    #[test]
    fn test_preview_duration_single_exercise() {
        let response = SessionService::preview_duration(&DurationPreviewRequest {
            durations: vec![40],
            rest_time_secs: 15,
        })
        .unwrap();
        assert_eq!(response.duration_secs, 40);
    }

    #[test]
    fn test_preview_duration_rejects_bad_rest_time() {
        let result = SessionService::preview_duration(&DurationPreviewRequest {
            durations: vec![30],
            rest_time_secs: 7,
        });
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }
}
