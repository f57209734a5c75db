//! Lesson entity model and DTOs.

use fathom_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A lesson row from the `lessons` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lesson {
    pub id: DbId,
    pub track_id: DbId,
    pub title: String,
    pub position: i64,
    pub content: String,
    pub pdf_url: Option<String>,
    pub podcast_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a lesson. The parent track comes from the path.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLesson {
    pub title: String,
    /// Appended after the last lesson of the track when omitted.
    pub position: Option<i64>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLesson {
    pub title: Option<String>,
    pub position: Option<i64>,
    pub content: Option<String>,
    pub pdf_url: Option<String>,
    pub podcast_url: Option<String>,
}
