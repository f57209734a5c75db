//! Repository for the `lessons` table.

use fathom_core::generation::GenerationKind;
use fathom_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::lesson::{CreateLesson, Lesson, UpdateLesson};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, track_id, title, position, content, pdf_url, podcast_url, created_at, updated_at";

/// Provides CRUD operations for lessons.
pub struct LessonRepo;

impl LessonRepo {
    /// Insert a lesson into a track. Without an explicit position the lesson
    /// is appended after the current last one.
    pub async fn create(
        pool: &SqlitePool,
        track_id: DbId,
        input: &CreateLesson,
    ) -> Result<Lesson, sqlx::Error> {
        let query = format!(
            "INSERT INTO lessons (track_id, title, position, content)
             VALUES ($1, $2,
                     COALESCE($3, (SELECT COALESCE(MAX(position), 0) + 1 FROM lessons WHERE track_id = $1)),
                     COALESCE($4, ''))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(track_id)
            .bind(&input.title)
            .bind(input.position)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Lesson>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lessons WHERE id = $1");
        sqlx::query_as::<_, Lesson>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a track's lessons in reading order.
    pub async fn list_by_track(pool: &SqlitePool, track_id: DbId) -> Result<Vec<Lesson>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lessons WHERE track_id = $1 ORDER BY position, id"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(track_id)
            .fetch_all(pool)
            .await
    }

    /// Update a lesson. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateLesson,
    ) -> Result<Option<Lesson>, sqlx::Error> {
        let query = format!(
            "UPDATE lessons SET
                title = COALESCE($2, title),
                position = COALESCE($3, position),
                content = COALESCE($4, content),
                pdf_url = COALESCE($5, pdf_url),
                podcast_url = COALESCE($6, podcast_url),
                updated_at = CURRENT_TIMESTAMP
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.position)
            .bind(&input.content)
            .bind(&input.pdf_url)
            .bind(&input.podcast_url)
            .fetch_optional(pool)
            .await
    }

    /// Record the URL of a freshly generated media artifact.
    ///
    /// Returns `false` if the lesson was deleted while generating.
    pub async fn set_media_url(
        pool: &SqlitePool,
        id: DbId,
        kind: GenerationKind,
        url: &str,
    ) -> Result<bool, sqlx::Error> {
        let column = match kind {
            GenerationKind::Pdf => "pdf_url",
            GenerationKind::Podcast => "podcast_url",
        };
        let query = format!(
            "UPDATE lessons SET {column} = $2, updated_at = CURRENT_TIMESTAMP WHERE id = $1"
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(url)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
