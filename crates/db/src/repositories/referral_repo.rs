//! Repository for the `affiliate_referrals` table.

use fathom_core::affiliate::{REFERRAL_CLICK, REFERRAL_CONVERSION, REFERRAL_SIGNUP};
use fathom_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::affiliate::{AffiliateReferral, AffiliateSummary, NewReferral};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, affiliate_id, kind, amount_cents, commission_cents, external_ref, created_at";

/// Records and aggregates affiliate referrals.
pub struct ReferralRepo;

impl ReferralRepo {
    /// A duplicate `external_ref` for the same affiliate fails with a
    /// unique violation.
    pub async fn create(
        pool: &SqlitePool,
        input: &NewReferral<'_>,
    ) -> Result<AffiliateReferral, sqlx::Error> {
        let query = format!(
            "INSERT INTO affiliate_referrals (affiliate_id, kind, amount_cents, commission_cents, external_ref)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AffiliateReferral>(&query)
            .bind(input.affiliate_id)
            .bind(input.kind)
            .bind(input.amount_cents)
            .bind(input.commission_cents)
            .bind(input.external_ref)
            .fetch_one(pool)
            .await
    }

    /// Referrals of one affiliate, newest first.
    pub async fn list_by_affiliate(
        pool: &SqlitePool,
        affiliate_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AffiliateReferral>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM affiliate_referrals
             WHERE affiliate_id = $1
             ORDER BY id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, AffiliateReferral>(&query)
            .bind(affiliate_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Totals per kind plus conversion revenue and commission.
    pub async fn summary(pool: &SqlitePool, affiliate_id: DbId) -> Result<AffiliateSummary, sqlx::Error> {
        sqlx::query_as::<_, AffiliateSummary>(
            "SELECT COALESCE(SUM(CASE WHEN kind = $2 THEN 1 ELSE 0 END), 0) AS clicks,
                    COALESCE(SUM(CASE WHEN kind = $3 THEN 1 ELSE 0 END), 0) AS signups,
                    COALESCE(SUM(CASE WHEN kind = $4 THEN 1 ELSE 0 END), 0) AS conversions,
                    COALESCE(SUM(CASE WHEN kind = $4 THEN amount_cents ELSE 0 END), 0) AS revenue_cents,
                    COALESCE(SUM(commission_cents), 0) AS commission_cents
             FROM affiliate_referrals
             WHERE affiliate_id = $1",
        )
        .bind(affiliate_id)
        .bind(REFERRAL_CLICK)
        .bind(REFERRAL_SIGNUP)
        .bind(REFERRAL_CONVERSION)
        .fetch_one(pool)
        .await
    }
}
