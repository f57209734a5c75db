//! Repository for the `tracks` table.

use fathom_core::course::DIFFICULTY_BEGINNER;
use fathom_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::track::{CreateTrack, Track, UpdateTrack};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, slug, description, difficulty, is_published, ai_tutor, \
                       sort_order, created_at, updated_at";

/// Provides CRUD operations for course tracks.
pub struct TrackRepo;

impl TrackRepo {
    /// Insert a new track under an already validated `slug`.
    ///
    /// `input.slug` is ignored; callers resolve it first.
    pub async fn create(
        pool: &SqlitePool,
        input: &CreateTrack,
        slug: &str,
    ) -> Result<Track, sqlx::Error> {
        let query = format!(
            "INSERT INTO tracks (title, slug, description, difficulty, is_published, ai_tutor, sort_order)
             VALUES ($1, $2, $3, COALESCE($4, $8), COALESCE($5, 0), $6, COALESCE($7, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Track>(&query)
            .bind(&input.title)
            .bind(slug)
            .bind(&input.description)
            .bind(&input.difficulty)
            .bind(input.is_published)
            .bind(&input.ai_tutor)
            .bind(input.sort_order)
            .bind(DIFFICULTY_BEGINNER)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Track>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tracks WHERE id = $1");
        sqlx::query_as::<_, Track>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<Track>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tracks WHERE slug = $1");
        sqlx::query_as::<_, Track>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List tracks by `sort_order`, then title. Drafts are included only on request.
    pub async fn list(pool: &SqlitePool, include_unpublished: bool) -> Result<Vec<Track>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tracks
             WHERE is_published = 1 OR $1
             ORDER BY sort_order, title, id"
        );
        sqlx::query_as::<_, Track>(&query)
            .bind(include_unpublished)
            .fetch_all(pool)
            .await
    }

    /// Update a track. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateTrack,
    ) -> Result<Option<Track>, sqlx::Error> {
        let query = format!(
            "UPDATE tracks SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                difficulty = COALESCE($4, difficulty),
                is_published = COALESCE($5, is_published),
                ai_tutor = COALESCE($6, ai_tutor),
                sort_order = COALESCE($7, sort_order),
                updated_at = CURRENT_TIMESTAMP
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Track>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.difficulty)
            .bind(input.is_published)
            .bind(&input.ai_tutor)
            .bind(input.sort_order)
            .fetch_optional(pool)
            .await
    }

    /// Delete a track and, by cascade, its lessons and quizzes.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tracks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
