//! Shared query parameter types for API handlers.

use fathom_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use fathom_core::types::DbId;
use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamped `(limit, offset)` pair.
    pub fn resolve(&self) -> (i64, i64) {
        (
            clamp_limit(self.limit, DEFAULT_LIMIT, MAX_LIMIT),
            clamp_offset(self.offset),
        )
    }
}

/// `?include_unpublished=true` on track listings. Honoured for authors only.
#[derive(Debug, Deserialize)]
pub struct IncludeUnpublishedParams {
    #[serde(default)]
    pub include_unpublished: bool,
}

/// `?track_id=` filter for deck listings.
#[derive(Debug, Deserialize)]
pub struct TrackFilterParams {
    pub track_id: Option<DbId>,
}

/// `?status=` filter for equipment listings.
#[derive(Debug, Deserialize)]
pub struct StatusFilterParams {
    pub status: Option<String>,
}

/// `?slot=` filter for active sponsor placements.
#[derive(Debug, Deserialize)]
pub struct SlotFilterParams {
    pub slot: Option<String>,
}

/// `?limit=` for queues that have no offset (SRS due cards).
#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

/// `?within_days=` look-ahead window for upcoming maintenance.
#[derive(Debug, Deserialize)]
pub struct WithinDaysParams {
    pub within_days: Option<i64>,
}
