//! Session favorite repository for database operations

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use super::session::SessionRecord;

/// Favorite repository
pub struct FavoriteRepository;

impl FavoriteRepository {
    /// Mark a session as a favorite of the user (idempotent)
    pub async fn add(pool: &PgPool, user_id: Uuid, session_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO session_favorites (session_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (session_id, user_id) DO NOTHING
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Remove a favorite; returns whether a row was removed
    pub async fn remove(pool: &PgPool, user_id: Uuid, session_id: Uuid) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM session_favorites WHERE session_id = $1 AND user_id = $2")
                .bind(session_id)
                .bind(user_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Check whether the user has favorited the session
    pub async fn exists(pool: &PgPool, user_id: Uuid, session_id: Uuid) -> Result<bool> {
        let exists: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM session_favorites
                WHERE session_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(exists.0)
    }

    /// Get the user's favorited sessions, most recently favorited first
    pub async fn list_sessions(pool: &PgPool, user_id: Uuid) -> Result<Vec<SessionRecord>> {
        let records = sqlx::query_as::<_, SessionRecord>(
            r#"
            SELECT s.id, s.name, s.description, s.category, s.difficulty,
                   s.rest_time_secs, s.duration_secs, s.rating, s.rating_count,
                   s.is_shared, s.created_by,
                   (SELECT COUNT(*) FROM session_exercises se
                    WHERE se.session_id = s.id) AS exercise_count,
                   s.created_at, s.updated_at
            FROM sessions s
            JOIN session_favorites f ON f.session_id = s.id
            WHERE f.user_id = $1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }
}
