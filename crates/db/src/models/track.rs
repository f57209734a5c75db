//! Track entity model and DTOs.

use fathom_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A course track row from the `tracks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Track {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub difficulty: String,
    pub is_published: bool,
    /// Identifier of the AI tutor persona assigned to this track.
    pub ai_tutor: Option<String>,
    pub sort_order: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new track.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTrack {
    pub title: String,
    /// Derived from `title` when omitted.
    pub slug: Option<String>,
    pub description: Option<String>,
    /// Defaults to `beginner`.
    pub difficulty: Option<String>,
    pub is_published: Option<bool>,
    pub ai_tutor: Option<String>,
    pub sort_order: Option<i64>,
}

/// DTO for updating a track. The slug cannot be changed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTrack {
    pub title: Option<String>,
    pub description: Option<String>,
    pub difficulty: Option<String>,
    pub is_published: Option<bool>,
    pub ai_tutor: Option<String>,
    pub sort_order: Option<i64>,
}
