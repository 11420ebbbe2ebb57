//! Session rating repository for database operations
//!
//! Ratings are upsert-only: one row per (session, user), never retracted.

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// Rating repository
pub struct RatingRepository;

impl RatingRepository {
    /// Insert or update a user's rating for a session
    pub async fn upsert(
        pool: &PgPool,
        session_id: Uuid,
        user_id: Uuid,
        value: i32,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO session_ratings (session_id, user_id, value)
            VALUES ($1, $2, $3)
            ON CONFLICT (session_id, user_id)
            DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .bind(value)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Get every rating value stored for a session.
    ///
    /// The aggregate is always recomputed from this full set after an
    /// upsert; no running sums are kept anywhere.
    pub async fn get_values(pool: &PgPool, session_id: Uuid) -> Result<Vec<i32>> {
        let rows: Vec<(i32,)> =
            sqlx::query_as("SELECT value FROM session_ratings WHERE session_id = $1")
                .bind(session_id)
                .fetch_all(pool)
                .await?;

        Ok(rows.into_iter().map(|(value,)| value).collect())
    }
}
