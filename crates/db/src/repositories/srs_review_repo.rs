//! Repository for per-user review state (`srs_review_states`) and its
//! history (`srs_review_logs`).

use fathom_core::srs::{Grade, ScheduledReview, MATURE_INTERVAL_DAYS};
use fathom_core::types::{DbId, Timestamp};
use sqlx::SqlitePool;

use crate::models::srs::{DeckStats, DueCard, SrsReviewLog, SrsReviewState};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, card_id, ease_factor, interval_days, repetitions, due_at, \
                       last_grade, last_reviewed_at";

const LOG_COLUMNS: &str = "id, user_id, card_id, grade, previous_due_at, next_due_at, reviewed_at";

/// Reads and writes spaced-repetition scheduling state.
pub struct SrsReviewRepo;

impl SrsReviewRepo {
    /// Current state of a card for a user; `None` means the card is new.
    pub async fn find_state(
        pool: &SqlitePool,
        user_id: DbId,
        card_id: DbId,
    ) -> Result<Option<SrsReviewState>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM srs_review_states WHERE user_id = $1 AND card_id = $2"
        );
        sqlx::query_as::<_, SrsReviewState>(&query)
            .bind(user_id)
            .bind(card_id)
            .fetch_optional(pool)
            .await
    }

    /// Persist a scheduled review: upsert the state row and append a log
    /// entry in one transaction.
    pub async fn record_review(
        pool: &SqlitePool,
        user_id: DbId,
        card_id: DbId,
        grade: Grade,
        scheduled: &ScheduledReview,
        previous_due_at: Option<Timestamp>,
        reviewed_at: Timestamp,
    ) -> Result<SrsReviewState, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO srs_review_states
                (user_id, card_id, ease_factor, interval_days, repetitions, due_at, last_grade, last_reviewed_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (user_id, card_id) DO UPDATE SET
                ease_factor = excluded.ease_factor,
                interval_days = excluded.interval_days,
                repetitions = excluded.repetitions,
                due_at = excluded.due_at,
                last_grade = excluded.last_grade,
                last_reviewed_at = excluded.last_reviewed_at
             RETURNING {COLUMNS}"
        );
        let state = sqlx::query_as::<_, SrsReviewState>(&query)
            .bind(user_id)
            .bind(card_id)
            .bind(scheduled.state.ease_factor)
            .bind(scheduled.state.interval_days)
            .bind(scheduled.state.repetitions)
            .bind(scheduled.due_at)
            .bind(grade.as_str())
            .bind(reviewed_at)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO srs_review_logs (user_id, card_id, grade, previous_due_at, next_due_at, reviewed_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user_id)
        .bind(card_id)
        .bind(grade.as_str())
        .bind(previous_due_at)
        .bind(scheduled.due_at)
        .bind(reviewed_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(state)
    }

    /// Cards of a deck that are new for the user or due at `now`.
    ///
    /// New cards sort as if due at `now`; ties break on card id.
    pub async fn list_due(
        pool: &SqlitePool,
        deck_id: DbId,
        user_id: DbId,
        now: Timestamp,
        limit: i64,
    ) -> Result<Vec<DueCard>, sqlx::Error> {
        sqlx::query_as::<_, DueCard>(
            "SELECT c.id, c.deck_id, c.front, c.back,
                    s.ease_factor, s.interval_days, s.repetitions, s.due_at
             FROM srs_cards c
             LEFT JOIN srs_review_states s ON s.card_id = c.id AND s.user_id = $2
             WHERE c.deck_id = $1 AND (s.id IS NULL OR s.due_at <= $3)
             ORDER BY COALESCE(s.due_at, $3), c.id
             LIMIT $4",
        )
        .bind(deck_id)
        .bind(user_id)
        .bind(now)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Per-user counters for a deck.
    pub async fn deck_stats(
        pool: &SqlitePool,
        deck_id: DbId,
        user_id: DbId,
        now: Timestamp,
    ) -> Result<DeckStats, sqlx::Error> {
        sqlx::query_as::<_, DeckStats>(
            "SELECT COUNT(c.id) AS total,
                    COALESCE(SUM(CASE WHEN s.id IS NULL THEN 1 ELSE 0 END), 0) AS new_cards,
                    COALESCE(SUM(CASE WHEN s.id IS NOT NULL AND s.due_at <= $3 THEN 1 ELSE 0 END), 0) AS due,
                    COALESCE(SUM(CASE WHEN s.interval_days >= $4 THEN 1 ELSE 0 END), 0) AS learned
             FROM srs_cards c
             LEFT JOIN srs_review_states s ON s.card_id = c.id AND s.user_id = $2
             WHERE c.deck_id = $1",
        )
        .bind(deck_id)
        .bind(user_id)
        .bind(now)
        .bind(MATURE_INTERVAL_DAYS)
        .fetch_one(pool)
        .await
    }

    /// Review history of one card for one user, newest first.
    pub async fn list_logs(
        pool: &SqlitePool,
        user_id: DbId,
        card_id: DbId,
    ) -> Result<Vec<SrsReviewLog>, sqlx::Error> {
        let query = format!(
            "SELECT {LOG_COLUMNS} FROM srs_review_logs
             WHERE user_id = $1 AND card_id = $2
             ORDER BY id DESC"
        );
        sqlx::query_as::<_, SrsReviewLog>(&query)
            .bind(user_id)
            .bind(card_id)
            .fetch_all(pool)
            .await
    }
}
