//! Session repository for database operations
//!
//! Sessions own their exercise entries: entry rewrites happen inside the
//! same transaction as the session row change, so a session is never visible
//! with a stale entry list or duration.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Session record from database
///
/// `exercise_count` is computed by the queries below, so summary listings
/// never need a second round-trip.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionRecord {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub difficulty: String,
    pub rest_time_secs: i32,
    pub duration_secs: i32,
    pub rating: f64,
    pub rating_count: i32,
    pub is_shared: bool,
    pub created_by: Option<Uuid>,
    pub exercise_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One session entry joined with its exercise name, in playback order
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionEntryRecord {
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub position: i32,
    pub duration_secs: i32,
}

/// Input for one entry of a session create/replace
#[derive(Debug, Clone)]
pub struct CreateSessionEntry {
    pub exercise_id: Uuid,
    pub position: i32,
    pub duration_secs: i32,
}

/// Input for creating a session
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub difficulty: String,
    pub rest_time_secs: i32,
    pub duration_secs: i32,
    pub created_by: Option<Uuid>,
    pub entries: Vec<CreateSessionEntry>,
}

/// Input for updating a session; `entries` replaces the whole list when set
#[derive(Debug, Clone)]
pub struct UpdateSession {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub difficulty: String,
    pub rest_time_secs: i32,
    pub duration_secs: i32,
    pub entries: Option<Vec<CreateSessionEntry>>,
}

const SESSION_COLUMNS: &str = r#"
    id, name, description, category, difficulty, rest_time_secs, duration_secs,
    rating, rating_count, is_shared, created_by,
    (SELECT COUNT(*) FROM session_exercises se WHERE se.session_id = sessions.id)
        AS exercise_count,
    created_at, updated_at
"#;

/// Session repository
pub struct SessionRepository;

impl SessionRepository {
    /// Create a session together with its ordered entries
    pub async fn create(pool: &PgPool, input: CreateSession) -> Result<SessionRecord> {
        let mut tx = pool.begin().await?;

        let session_id: (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO sessions (name, description, category, difficulty,
                                  rest_time_secs, duration_secs, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.category)
        .bind(&input.difficulty)
        .bind(input.rest_time_secs)
        .bind(input.duration_secs)
        .bind(input.created_by)
        .fetch_one(&mut *tx)
        .await?;

        Self::insert_entries(&mut tx, session_id.0, &input.entries).await?;
        tx.commit().await?;

        let record = Self::get_by_id(pool, session_id.0)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Session vanished after insert"))?;
        Ok(record)
    }

    /// Get session by ID
    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<SessionRecord>> {
        let record = sqlx::query_as::<_, SessionRecord>(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Get a session's entries in playback order
    pub async fn get_entries(pool: &PgPool, session_id: Uuid) -> Result<Vec<SessionEntryRecord>> {
        let records = sqlx::query_as::<_, SessionEntryRecord>(
            r#"
            SELECT se.exercise_id, e.name AS exercise_name, se.position, se.duration_secs
            FROM session_exercises se
            JOIN exercises e ON e.id = se.exercise_id
            WHERE se.session_id = $1
            ORDER BY se.position
            "#,
        )
        .bind(session_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Get sessions owned by a user, newest first
    pub async fn list_by_owner(pool: &PgPool, user_id: Uuid) -> Result<Vec<SessionRecord>> {
        let records = sqlx::query_as::<_, SessionRecord>(&format!(
            r#"
            SELECT {SESSION_COLUMNS} FROM sessions
            WHERE created_by = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Get community sessions with optional filters, best rated first
    pub async fn list_shared(
        pool: &PgPool,
        category: Option<&str>,
        difficulty: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SessionRecord>> {
        let records = sqlx::query_as::<_, SessionRecord>(&format!(
            r#"
            SELECT {SESSION_COLUMNS} FROM sessions
            WHERE is_shared = TRUE
              AND ($1::text IS NULL OR category = $1)
              AND ($2::text IS NULL OR difficulty = $2)
            ORDER BY rating DESC, rating_count DESC, created_at DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(category)
        .bind(difficulty)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Update a session and, when given, replace its entry list
    pub async fn update(pool: &PgPool, id: Uuid, input: UpdateSession) -> Result<SessionRecord> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE sessions
            SET name = $2, description = $3, category = $4, difficulty = $5,
                rest_time_secs = $6, duration_secs = $7, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.category)
        .bind(&input.difficulty)
        .bind(input.rest_time_secs)
        .bind(input.duration_secs)
        .execute(&mut *tx)
        .await?;

        if let Some(entries) = &input.entries {
            sqlx::query("DELETE FROM session_exercises WHERE session_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            Self::insert_entries(&mut tx, id, entries).await?;
        }

        tx.commit().await?;

        let record = Self::get_by_id(pool, id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Session vanished after update"))?;
        Ok(record)
    }

    /// Delete a session; returns whether a row was removed.
    /// Entries, ratings and favorites cascade at the schema level.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Set the shared flag
    pub async fn set_shared(pool: &PgPool, id: Uuid, is_shared: bool) -> Result<()> {
        sqlx::query("UPDATE sessions SET is_shared = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(is_shared)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Persist a recomputed rating aggregate
    pub async fn update_rating(
        pool: &PgPool,
        id: Uuid,
        rating: f64,
        rating_count: i32,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE sessions SET rating = $2, rating_count = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(rating)
        .bind(rating_count)
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn insert_entries(
        tx: &mut Transaction<'_, Postgres>,
        session_id: Uuid,
        entries: &[CreateSessionEntry],
    ) -> Result<()> {
        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO session_exercises (session_id, exercise_id, position, duration_secs)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(session_id)
            .bind(entry.exercise_id)
            .bind(entry.position)
            .bind(entry.duration_secs)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}
