//! Spaced-repetition decks, cards, and per-user review state.

use fathom_core::srs::{Grade, ReviewState};
use fathom_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Decks and cards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SrsDeck {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub track_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSrsDeck {
    pub name: String,
    pub description: Option<String>,
    pub track_id: Option<DbId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSrsDeck {
    pub name: Option<String>,
    pub description: Option<String>,
    pub track_id: Option<DbId>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SrsCard {
    pub id: DbId,
    pub deck_id: DbId,
    pub front: String,
    pub back: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSrsCard {
    pub front: String,
    pub back: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSrsCard {
    pub front: Option<String>,
    pub back: Option<String>,
}

// ---------------------------------------------------------------------------
// Review state
// ---------------------------------------------------------------------------

/// Scheduling state of one card for one user (`srs_review_states`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SrsReviewState {
    pub id: DbId,
    pub user_id: DbId,
    pub card_id: DbId,
    pub ease_factor: f64,
    pub interval_days: i64,
    pub repetitions: i64,
    pub due_at: Timestamp,
    pub last_grade: String,
    pub last_reviewed_at: Timestamp,
}

impl SrsReviewState {
    /// The scheduler inputs carried by this row.
    pub fn state(&self) -> ReviewState {
        ReviewState {
            ease_factor: self.ease_factor,
            interval_days: self.interval_days,
            repetitions: self.repetitions,
        }
    }
}

/// Append-only history row (`srs_review_logs`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SrsReviewLog {
    pub id: DbId,
    pub user_id: DbId,
    pub card_id: DbId,
    pub grade: String,
    pub previous_due_at: Option<Timestamp>,
    pub next_due_at: Timestamp,
    pub reviewed_at: Timestamp,
}

/// A card in the caller's due queue. State columns are `None` for new cards.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DueCard {
    pub id: DbId,
    pub deck_id: DbId,
    pub front: String,
    pub back: String,
    pub ease_factor: Option<f64>,
    pub interval_days: Option<i64>,
    pub repetitions: Option<i64>,
    pub due_at: Option<Timestamp>,
}

/// Per-user counters for one deck.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DeckStats {
    pub total: i64,
    /// Never reviewed by this user.
    pub new_cards: i64,
    /// Reviewed before and due now.
    pub due: i64,
    /// Interval has reached the mature threshold.
    pub learned: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitReview {
    pub card_id: DbId,
    pub grade: Grade,
}
