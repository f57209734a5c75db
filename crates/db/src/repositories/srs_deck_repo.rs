//! Repository for the `srs_decks` table.

use fathom_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::srs::{CreateSrsDeck, SrsDeck, UpdateSrsDeck};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, track_id, created_at, updated_at";

/// Provides CRUD operations for review decks.
pub struct SrsDeckRepo;

impl SrsDeckRepo {
    pub async fn create(pool: &SqlitePool, input: &CreateSrsDeck) -> Result<SrsDeck, sqlx::Error> {
        let query = format!(
            "INSERT INTO srs_decks (name, description, track_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SrsDeck>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.track_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<SrsDeck>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM srs_decks WHERE id = $1");
        sqlx::query_as::<_, SrsDeck>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List decks, optionally only those attached to one track.
    pub async fn list(pool: &SqlitePool, track_id: Option<DbId>) -> Result<Vec<SrsDeck>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM srs_decks
             WHERE $1 IS NULL OR track_id = $1
             ORDER BY name, id"
        );
        sqlx::query_as::<_, SrsDeck>(&query)
            .bind(track_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateSrsDeck,
    ) -> Result<Option<SrsDeck>, sqlx::Error> {
        let query = format!(
            "UPDATE srs_decks SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                track_id = COALESCE($4, track_id),
                updated_at = CURRENT_TIMESTAMP
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SrsDeck>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.track_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM srs_decks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
