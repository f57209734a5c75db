//! Sponsor and sponsor placement models and DTOs.

use fathom_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Sponsor {
    pub id: DbId,
    pub name: String,
    pub website_url: Option<String>,
    pub logo_url: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSponsor {
    pub name: String,
    pub website_url: Option<String>,
    pub logo_url: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSponsor {
    pub name: Option<String>,
    pub website_url: Option<String>,
    pub logo_url: Option<String>,
    pub is_active: Option<bool>,
}

/// A row from the `sponsor_placements` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SponsorPlacement {
    pub id: DbId,
    pub sponsor_id: DbId,
    pub slot: String,
    pub cta_text: String,
    pub cta_url: String,
    pub starts_at: Timestamp,
    /// Open-ended when `None`.
    pub ends_at: Option<Timestamp>,
    pub priority: i64,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSponsorPlacement {
    pub slot: String,
    pub cta_text: String,
    pub cta_url: String,
    /// Defaults to now.
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub priority: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSponsorPlacement {
    pub slot: Option<String>,
    pub cta_text: Option<String>,
    pub cta_url: Option<String>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub priority: Option<i64>,
    pub is_active: Option<bool>,
}

/// A live placement joined with the sponsor it advertises.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivePlacement {
    pub id: DbId,
    pub sponsor_id: DbId,
    pub sponsor_name: String,
    pub sponsor_logo_url: Option<String>,
    pub slot: String,
    pub cta_text: String,
    pub cta_url: String,
    pub priority: i64,
    pub ends_at: Option<Timestamp>,
}
