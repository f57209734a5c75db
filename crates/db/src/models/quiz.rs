//! Quiz, question, and attempt models and DTOs.

use fathom_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Quiz
// ---------------------------------------------------------------------------

/// A quiz row from the `quizzes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Quiz {
    pub id: DbId,
    pub lesson_id: DbId,
    pub title: String,
    pub pass_mark_percent: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuiz {
    pub title: String,
    /// Defaults to 70.
    pub pass_mark_percent: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateQuiz {
    pub title: Option<String>,
    pub pass_mark_percent: Option<i64>,
}

/// A quiz together with its questions, answers withheld.
#[derive(Debug, Clone, Serialize)]
pub struct QuizDetail {
    #[serde(flatten)]
    pub quiz: Quiz,
    pub questions: Vec<PublicQuestion>,
}

// ---------------------------------------------------------------------------
// Question
// ---------------------------------------------------------------------------

/// A question row from the `questions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Question {
    pub id: DbId,
    pub quiz_id: DbId,
    pub prompt: String,
    pub options: Json<Vec<String>>,
    pub correct_index: i64,
    pub explanation: Option<String>,
    pub position: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Question as shown to someone taking the quiz.
#[derive(Debug, Clone, Serialize)]
pub struct PublicQuestion {
    pub id: DbId,
    pub prompt: String,
    pub options: Vec<String>,
    pub position: i64,
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            prompt: q.prompt,
            options: q.options.0,
            position: q.position,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: i64,
    pub explanation: Option<String>,
    /// Appended after the last question when omitted.
    pub position: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateQuestion {
    pub prompt: Option<String>,
    pub options: Option<Vec<String>>,
    pub correct_index: Option<i64>,
    pub explanation: Option<String>,
    pub position: Option<i64>,
}

// ---------------------------------------------------------------------------
// Attempt
// ---------------------------------------------------------------------------

/// A scored submission from the `quiz_attempts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuizAttempt {
    pub id: DbId,
    pub quiz_id: DbId,
    pub user_id: DbId,
    /// Chosen option index per question, in question order.
    pub answers: Json<Vec<i64>>,
    pub score_percent: i64,
    pub passed: bool,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAttempt {
    pub answers: Vec<i64>,
}
