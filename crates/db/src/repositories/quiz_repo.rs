//! Repository for the `quizzes` table.

use fathom_core::course::DEFAULT_PASS_MARK_PERCENT;
use fathom_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::quiz::{CreateQuiz, Quiz, UpdateQuiz};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, lesson_id, title, pass_mark_percent, created_at, updated_at";

/// Provides CRUD operations for quizzes.
pub struct QuizRepo;

impl QuizRepo {
    pub async fn create(
        pool: &SqlitePool,
        lesson_id: DbId,
        input: &CreateQuiz,
    ) -> Result<Quiz, sqlx::Error> {
        let query = format!(
            "INSERT INTO quizzes (lesson_id, title, pass_mark_percent)
             VALUES ($1, $2, COALESCE($3, $4))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Quiz>(&query)
            .bind(lesson_id)
            .bind(&input.title)
            .bind(input.pass_mark_percent)
            .bind(DEFAULT_PASS_MARK_PERCENT)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Quiz>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quizzes WHERE id = $1");
        sqlx::query_as::<_, Quiz>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_lesson(pool: &SqlitePool, lesson_id: DbId) -> Result<Vec<Quiz>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quizzes WHERE lesson_id = $1 ORDER BY id");
        sqlx::query_as::<_, Quiz>(&query)
            .bind(lesson_id)
            .fetch_all(pool)
            .await
    }

    /// Update a quiz. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateQuiz,
    ) -> Result<Option<Quiz>, sqlx::Error> {
        let query = format!(
            "UPDATE quizzes SET
                title = COALESCE($2, title),
                pass_mark_percent = COALESCE($3, pass_mark_percent),
                updated_at = CURRENT_TIMESTAMP
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Quiz>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.pass_mark_percent)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM quizzes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
