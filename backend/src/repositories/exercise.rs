//! Exercise catalog repository for database operations
//!
//! The catalog is curated through migrations/seeding; the API only reads it.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Exercise record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExerciseRecord {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub subcategory: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Exercise repository
pub struct ExerciseRepository;

impl ExerciseRepository {
    /// Get all catalog exercises, optionally filtered by category
    pub async fn get_all(pool: &PgPool, category: Option<&str>) -> Result<Vec<ExerciseRecord>> {
        let records = match category {
            Some(category) => {
                sqlx::query_as::<_, ExerciseRecord>(
                    r#"
                    SELECT id, name, description, category, subcategory, image,
                           created_at, updated_at
                    FROM exercises
                    WHERE category = $1
                    ORDER BY subcategory, name
                    "#,
                )
                .bind(category)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ExerciseRecord>(
                    r#"
                    SELECT id, name, description, category, subcategory, image,
                           created_at, updated_at
                    FROM exercises
                    ORDER BY category, subcategory, name
                    "#,
                )
                .fetch_all(pool)
                .await?
            }
        };

        Ok(records)
    }

    /// Search exercises by name
    pub async fn search(pool: &PgPool, query: &str, limit: i64) -> Result<Vec<ExerciseRecord>> {
        let records = sqlx::query_as::<_, ExerciseRecord>(
            r#"
            SELECT id, name, description, category, subcategory, image,
                   created_at, updated_at
            FROM exercises
            WHERE LOWER(name) LIKE LOWER($1)
            ORDER BY name
            LIMIT $2
            "#,
        )
        .bind(format!("%{}%", query))
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Get exercise by ID
    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<ExerciseRecord>> {
        let record = sqlx::query_as::<_, ExerciseRecord>(
            r#"
            SELECT id, name, description, category, subcategory, image,
                   created_at, updated_at
            FROM exercises
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Get several exercises by ID (for validating session entries)
    pub async fn get_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<ExerciseRecord>> {
        let records = sqlx::query_as::<_, ExerciseRecord>(
            r#"
            SELECT id, name, description, category, subcategory, image,
                   created_at, updated_at
            FROM exercises
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }
}
