//! Repository for the `sponsor_placements` table.

use fathom_core::types::{DbId, Timestamp};
use sqlx::SqlitePool;

use crate::models::sponsor::{
    ActivePlacement, CreateSponsorPlacement, SponsorPlacement, UpdateSponsorPlacement,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, sponsor_id, slot, cta_text, cta_url, starts_at, ends_at, priority, \
                       is_active, created_at, updated_at";

/// Provides CRUD operations for sponsor placements.
pub struct SponsorPlacementRepo;

impl SponsorPlacementRepo {
    /// Insert a placement whose window has already been validated.
    pub async fn create(
        pool: &SqlitePool,
        sponsor_id: DbId,
        starts_at: Timestamp,
        input: &CreateSponsorPlacement,
    ) -> Result<SponsorPlacement, sqlx::Error> {
        let query = format!(
            "INSERT INTO sponsor_placements
                (sponsor_id, slot, cta_text, cta_url, starts_at, ends_at, priority, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 0), COALESCE($8, 1))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SponsorPlacement>(&query)
            .bind(sponsor_id)
            .bind(&input.slot)
            .bind(&input.cta_text)
            .bind(&input.cta_url)
            .bind(starts_at)
            .bind(input.ends_at)
            .bind(input.priority)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &SqlitePool,
        id: DbId,
    ) -> Result<Option<SponsorPlacement>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sponsor_placements WHERE id = $1");
        sqlx::query_as::<_, SponsorPlacement>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_sponsor(
        pool: &SqlitePool,
        sponsor_id: DbId,
    ) -> Result<Vec<SponsorPlacement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sponsor_placements WHERE sponsor_id = $1 ORDER BY starts_at, id"
        );
        sqlx::query_as::<_, SponsorPlacement>(&query)
            .bind(sponsor_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateSponsorPlacement,
    ) -> Result<Option<SponsorPlacement>, sqlx::Error> {
        let query = format!(
            "UPDATE sponsor_placements SET
                slot = COALESCE($2, slot),
                cta_text = COALESCE($3, cta_text),
                cta_url = COALESCE($4, cta_url),
                starts_at = COALESCE($5, starts_at),
                ends_at = COALESCE($6, ends_at),
                priority = COALESCE($7, priority),
                is_active = COALESCE($8, is_active),
                updated_at = CURRENT_TIMESTAMP
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SponsorPlacement>(&query)
            .bind(id)
            .bind(&input.slot)
            .bind(&input.cta_text)
            .bind(&input.cta_url)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(input.priority)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sponsor_placements WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Placements that are live at `now`: active, of an active sponsor, and
    /// inside their `[starts_at, ends_at)` window. Highest priority first.
    pub async fn list_active(
        pool: &SqlitePool,
        slot: Option<&str>,
        now: Timestamp,
    ) -> Result<Vec<ActivePlacement>, sqlx::Error> {
        sqlx::query_as::<_, ActivePlacement>(
            "SELECT p.id, p.sponsor_id, s.name AS sponsor_name, s.logo_url AS sponsor_logo_url,
                    p.slot, p.cta_text, p.cta_url, p.priority, p.ends_at
             FROM sponsor_placements p
             JOIN sponsors s ON s.id = p.sponsor_id
             WHERE p.is_active = 1
               AND s.is_active = 1
               AND p.starts_at <= $1
               AND (p.ends_at IS NULL OR p.ends_at > $1)
               AND ($2 IS NULL OR p.slot = $2)
             ORDER BY p.priority DESC, p.id",
        )
        .bind(now)
        .bind(slot)
        .fetch_all(pool)
        .await
    }
}
