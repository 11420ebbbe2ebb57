//! API request and response types

use crate::models::{Category, Difficulty};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ============================================================================
// Authentication Types
// ============================================================================

/// Authentication tokens response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// User profile response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Exercise Catalog Types
// ============================================================================

/// Catalog exercise response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    pub subcategory: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Catalog listing query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExerciseListQuery {
    #[serde(default)]
    pub category: Option<String>,
}

/// Catalog search query parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseSearchQuery {
    pub q: String,
    #[serde(default)]
    pub limit: Option<i64>,
}

// ============================================================================
// Session Types
// ============================================================================

/// One exercise within a session create/update request.
///
/// Entries are ordered by their position in the list; the server assigns
/// 1-based order values from that position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionExerciseInput {
    pub exercise_id: Uuid,
    /// Defaults to 30 seconds when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u32>,
}

/// Create session request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: Category,
    pub difficulty: Difficulty,
    pub rest_time_secs: u32,
    pub exercises: Vec<SessionExerciseInput>,
}

/// Update session request; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSessionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest_time_secs: Option<u32>,
    /// Replaces the whole exercise list when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercises: Option<Vec<SessionExerciseInput>>,
}

/// Session summary response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    pub difficulty: String,
    pub rest_time_secs: u32,
    pub duration_secs: u32,
    pub rating: f64,
    pub rating_count: i32,
    pub is_shared: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    pub exercise_count: i64,
    pub created_at: DateTime<Utc>,
}

/// One entry in a session detail response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEntryResponse {
    pub exercise_id: String,
    pub exercise_name: String,
    pub order: u32,
    pub duration_secs: u32,
}

/// Session with its ordered exercises
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDetailResponse {
    #[serde(flatten)]
    pub session: SessionResponse,
    pub entries: Vec<SessionEntryResponse>,
}

/// Share toggle response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareResponse {
    pub id: String,
    pub is_shared: bool,
}

/// Community session listing query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SharedSessionsQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

impl SharedSessionsQuery {
    /// Clamp pagination to sane bounds (limit 1-100, default 50)
    pub fn normalize(mut self) -> Self {
        self.limit = Some(self.limit.unwrap_or(50).clamp(1, 100));
        self.offset = Some(self.offset.unwrap_or(0).max(0));
        self
    }
}

/// Duration preview request. The client-side configuration screen asks the
/// server for the same computation it previews locally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationPreviewRequest {
    pub durations: Vec<u32>,
    pub rest_time_secs: u32,
}

/// Duration preview response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationPreviewResponse {
    pub duration_secs: u32,
}

// ============================================================================
// Playback Types
// ============================================================================

/// One playable step in a playback launch payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackEntryResponse {
    pub exercise_id: String,
    pub exercise_name: String,
    pub order: u32,
    pub duration_secs: u32,
}

/// Everything the client needs to construct a playback engine for a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackSessionResponse {
    pub session_id: String,
    pub rest_time_secs: u32,
    pub countdown_secs: u32,
    pub entries: Vec<PlaybackEntryResponse>,
}

// ============================================================================
// Rating and Favorite Types
// ============================================================================

/// Rate session request (1-5 stars)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSessionRequest {
    pub rating: u8,
}

/// Aggregate rating after an upsert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingSummaryResponse {
    pub session_id: String,
    pub rating: f64,
    pub rating_count: i32,
}

/// Favorite toggle response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteResponse {
    pub session_id: String,
    pub is_favorite: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_query_normalize_defaults() {
        let query = SharedSessionsQuery::default().normalize();
        assert_eq!(query.limit, Some(50));
        assert_eq!(query.offset, Some(0));
    }

    #[test]
    fn test_shared_query_normalize_clamps() {
        let query = SharedSessionsQuery {
            limit: Some(1000),
            offset: Some(-5),
            ..Default::default()
        }
        .normalize();
        assert_eq!(query.limit, Some(100));
        assert_eq!(query.offset, Some(0));
    }

    #[test]
    fn test_create_request_deserializes_enums() {
        let json = r#"{
            "name": "Push day",
            "category": "musculation",
            "difficulty": "moyen",
            "rest_time_secs": 10,
            "exercises": [{"exercise_id": "8c3f4f9e-7e1a-4a6a-9e61-0a9b27c8d001"}]
        }"#;
        let request: CreateSessionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.category, Category::Musculation);
        assert_eq!(request.difficulty, Difficulty::Moyen);
        assert!(request.exercises[0].duration_secs.is_none());
    }
}
