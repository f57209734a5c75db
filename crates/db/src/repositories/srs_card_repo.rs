//! Repository for the `srs_cards` table.

use fathom_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::srs::{CreateSrsCard, SrsCard, UpdateSrsCard};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, deck_id, front, back, created_at, updated_at";

/// Provides CRUD operations for review cards.
pub struct SrsCardRepo;

impl SrsCardRepo {
    pub async fn create(
        pool: &SqlitePool,
        deck_id: DbId,
        input: &CreateSrsCard,
    ) -> Result<SrsCard, sqlx::Error> {
        let query = format!(
            "INSERT INTO srs_cards (deck_id, front, back)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SrsCard>(&query)
            .bind(deck_id)
            .bind(&input.front)
            .bind(&input.back)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<SrsCard>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM srs_cards WHERE id = $1");
        sqlx::query_as::<_, SrsCard>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_deck(pool: &SqlitePool, deck_id: DbId) -> Result<Vec<SrsCard>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM srs_cards WHERE deck_id = $1 ORDER BY id");
        sqlx::query_as::<_, SrsCard>(&query)
            .bind(deck_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateSrsCard,
    ) -> Result<Option<SrsCard>, sqlx::Error> {
        let query = format!(
            "UPDATE srs_cards SET
                front = COALESCE($2, front),
                back = COALESCE($3, back),
                updated_at = CURRENT_TIMESTAMP
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SrsCard>(&query)
            .bind(id)
            .bind(&input.front)
            .bind(&input.back)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM srs_cards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
