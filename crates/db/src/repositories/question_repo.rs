//! Repository for the `questions` table.

use fathom_core::types::DbId;
use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::models::quiz::{CreateQuestion, Question, UpdateQuestion};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, quiz_id, prompt, options, correct_index, explanation, position, \
                       created_at, updated_at";

/// Provides CRUD operations for quiz questions.
pub struct QuestionRepo;

impl QuestionRepo {
    /// Insert a question. Options and answer index must already be validated.
    pub async fn create(
        pool: &SqlitePool,
        quiz_id: DbId,
        input: &CreateQuestion,
    ) -> Result<Question, sqlx::Error> {
        let query = format!(
            "INSERT INTO questions (quiz_id, prompt, options, correct_index, explanation, position)
             VALUES ($1, $2, $3, $4, $5,
                     COALESCE($6, (SELECT COALESCE(MAX(position), 0) + 1 FROM questions WHERE quiz_id = $1)))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(quiz_id)
            .bind(&input.prompt)
            .bind(Json(&input.options))
            .bind(input.correct_index)
            .bind(&input.explanation)
            .bind(input.position)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Question>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM questions WHERE id = $1");
        sqlx::query_as::<_, Question>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a quiz's questions in presentation order.
    pub async fn list_by_quiz(pool: &SqlitePool, quiz_id: DbId) -> Result<Vec<Question>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM questions WHERE quiz_id = $1 ORDER BY position, id"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(quiz_id)
            .fetch_all(pool)
            .await
    }

    /// Update a question. Only non-`None` fields in `input` are applied.
    ///
    /// The caller validates the merged options and answer index first.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateQuestion,
    ) -> Result<Option<Question>, sqlx::Error> {
        let query = format!(
            "UPDATE questions SET
                prompt = COALESCE($2, prompt),
                options = COALESCE($3, options),
                correct_index = COALESCE($4, correct_index),
                explanation = COALESCE($5, explanation),
                position = COALESCE($6, position),
                updated_at = CURRENT_TIMESTAMP
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(id)
            .bind(&input.prompt)
            .bind(input.options.as_ref().map(Json))
            .bind(input.correct_index)
            .bind(&input.explanation)
            .bind(input.position)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
