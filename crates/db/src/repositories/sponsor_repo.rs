//! Repository for the `sponsors` table.

use fathom_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::sponsor::{CreateSponsor, Sponsor, UpdateSponsor};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, website_url, logo_url, is_active, created_at, updated_at";

/// Provides CRUD operations for sponsors.
pub struct SponsorRepo;

impl SponsorRepo {
    pub async fn create(pool: &SqlitePool, input: &CreateSponsor) -> Result<Sponsor, sqlx::Error> {
        let query = format!(
            "INSERT INTO sponsors (name, website_url, logo_url, is_active)
             VALUES ($1, $2, $3, COALESCE($4, 1))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Sponsor>(&query)
            .bind(&input.name)
            .bind(&input.website_url)
            .bind(&input.logo_url)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Sponsor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sponsors WHERE id = $1");
        sqlx::query_as::<_, Sponsor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &SqlitePool) -> Result<Vec<Sponsor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sponsors ORDER BY name");
        sqlx::query_as::<_, Sponsor>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateSponsor,
    ) -> Result<Option<Sponsor>, sqlx::Error> {
        let query = format!(
            "UPDATE sponsors SET
                name = COALESCE($2, name),
                website_url = COALESCE($3, website_url),
                logo_url = COALESCE($4, logo_url),
                is_active = COALESCE($5, is_active),
                updated_at = CURRENT_TIMESTAMP
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Sponsor>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.website_url)
            .bind(&input.logo_url)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a sponsor and, by cascade, its placements.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sponsors WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
