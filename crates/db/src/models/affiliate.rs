//! Affiliate and referral models and DTOs.

use fathom_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Affiliate {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub code: String,
    /// Commission in basis points (1000 = 10%).
    pub commission_rate_bps: i64,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAffiliate {
    pub name: String,
    pub email: String,
    /// Generated when omitted.
    pub code: Option<String>,
    pub commission_rate_bps: Option<i64>,
}

/// The referral code is immutable once issued.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAffiliate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub commission_rate_bps: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AffiliateReferral {
    pub id: DbId,
    pub affiliate_id: DbId,
    pub kind: String,
    pub amount_cents: i64,
    pub commission_cents: i64,
    pub external_ref: Option<String>,
    pub created_at: Timestamp,
}

/// Insert payload for a referral; the commission is computed by the caller.
#[derive(Debug, Clone)]
pub struct NewReferral<'a> {
    pub affiliate_id: DbId,
    pub kind: &'a str,
    pub amount_cents: i64,
    pub commission_cents: i64,
    pub external_ref: Option<&'a str>,
}

/// Public tracking request body.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackReferral {
    pub code: String,
    pub kind: String,
    pub amount_cents: Option<i64>,
    pub external_ref: Option<String>,
}

/// Aggregated referral totals for one affiliate.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AffiliateSummary {
    pub clicks: i64,
    pub signups: i64,
    pub conversions: i64,
    pub revenue_cents: i64,
    pub commission_cents: i64,
}
