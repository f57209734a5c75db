//! Repository for the `quiz_attempts` table.

use fathom_core::course::QuizScore;
use fathom_core::types::DbId;
use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::models::quiz::QuizAttempt;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, quiz_id, user_id, answers, score_percent, passed, created_at";

/// Stores scored quiz submissions. Attempts are never updated.
pub struct QuizAttemptRepo;

impl QuizAttemptRepo {
    pub async fn create(
        pool: &SqlitePool,
        quiz_id: DbId,
        user_id: DbId,
        answers: &[i64],
        score: &QuizScore,
    ) -> Result<QuizAttempt, sqlx::Error> {
        let query = format!(
            "INSERT INTO quiz_attempts (quiz_id, user_id, answers, score_percent, passed)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QuizAttempt>(&query)
            .bind(quiz_id)
            .bind(user_id)
            .bind(Json(answers))
            .bind(score.score_percent)
            .bind(score.passed)
            .fetch_one(pool)
            .await
    }

    /// A user's attempts at one quiz, newest first.
    pub async fn list_for_user(
        pool: &SqlitePool,
        quiz_id: DbId,
        user_id: DbId,
    ) -> Result<Vec<QuizAttempt>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quiz_attempts
             WHERE quiz_id = $1 AND user_id = $2
             ORDER BY id DESC"
        );
        sqlx::query_as::<_, QuizAttempt>(&query)
            .bind(quiz_id)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
