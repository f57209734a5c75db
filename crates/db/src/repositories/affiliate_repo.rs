//! Repository for the `affiliates` table.

use fathom_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::affiliate::{Affiliate, CreateAffiliate, UpdateAffiliate};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, email, code, commission_rate_bps, is_active, created_at, updated_at";

/// Default commission: 10%.
const DEFAULT_COMMISSION_BPS: i64 = 1_000;

/// Provides CRUD operations for affiliates.
pub struct AffiliateRepo;

impl AffiliateRepo {
    /// Insert an affiliate under an already normalized `code`.
    pub async fn create(
        pool: &SqlitePool,
        input: &CreateAffiliate,
        code: &str,
    ) -> Result<Affiliate, sqlx::Error> {
        let query = format!(
            "INSERT INTO affiliates (name, email, code, commission_rate_bps)
             VALUES ($1, $2, $3, COALESCE($4, $5))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Affiliate>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(code)
            .bind(input.commission_rate_bps)
            .bind(DEFAULT_COMMISSION_BPS)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Affiliate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM affiliates WHERE id = $1");
        sqlx::query_as::<_, Affiliate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Look up an affiliate by its normalized referral code.
    pub async fn find_by_code(pool: &SqlitePool, code: &str) -> Result<Option<Affiliate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM affiliates WHERE code = $1");
        sqlx::query_as::<_, Affiliate>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &SqlitePool) -> Result<Vec<Affiliate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM affiliates ORDER BY name, id");
        sqlx::query_as::<_, Affiliate>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateAffiliate,
    ) -> Result<Option<Affiliate>, sqlx::Error> {
        let query = format!(
            "UPDATE affiliates SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                commission_rate_bps = COALESCE($4, commission_rate_bps),
                is_active = COALESCE($5, is_active),
                updated_at = CURRENT_TIMESTAMP
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Affiliate>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(input.commission_rate_bps)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM affiliates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
