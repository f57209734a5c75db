//! Handlers for quizzes and quiz attempts.
//!
//! A quiz fetched by a learner carries its questions without the correct
//! answers; answers are only revealed through attempt scoring.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fathom_core::course::{score_attempt, validate_pass_mark};
use fathom_core::error::{require_non_blank, CoreError};
use fathom_core::types::DbId;
use fathom_db::models::quiz::{CreateQuiz, PublicQuestion, Quiz, QuizDetail, SubmitAttempt, UpdateQuiz};
use fathom_db::repositories::{QuestionRepo, QuizAttemptRepo, QuizRepo};
use fathom_db::DbPool;
use serde::Serialize;

use super::lesson::{ensure_lesson_exists, ensure_lesson_visible};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::middleware::rbac::{RequireAuth, RequireInstructor};
use crate::response::DataResponse;
use crate::state::AppState;

/// Result of a scored attempt.
#[derive(Debug, Serialize)]
pub struct AttemptResult {
    pub attempt_id: DbId,
    pub correct: i64,
    pub total: i64,
    pub score_percent: i64,
    pub passed: bool,
    pub pass_mark_percent: i64,
}

pub(crate) async fn ensure_quiz_exists(pool: &DbPool, id: DbId) -> AppResult<Quiz> {
    QuizRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Quiz", id }))
}

async fn ensure_quiz_visible(pool: &DbPool, id: DbId, viewer: Option<&AuthUser>) -> AppResult<Quiz> {
    let quiz = ensure_quiz_exists(pool, id).await?;
    ensure_lesson_visible(pool, quiz.lesson_id, viewer)
        .await
        .map_err(|_| AppError::Core(CoreError::NotFound { entity: "Quiz", id }))?;
    Ok(quiz)
}

/// GET /api/lessons/{lesson_id}/quizzes
pub async fn list_by_lesson(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(lesson_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_lesson_visible(&state.pool, lesson_id, viewer.as_ref()).await?;
    let quizzes = QuizRepo::list_by_lesson(&state.pool, lesson_id).await?;
    Ok(Json(DataResponse { data: quizzes }))
}

/// GET /api/quizzes/{id}
///
/// The quiz with its questions, answers withheld.
pub async fn get(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let quiz = ensure_quiz_visible(&state.pool, id, viewer.as_ref()).await?;
    let questions = QuestionRepo::list_by_quiz(&state.pool, id)
        .await?
        .into_iter()
        .map(PublicQuestion::from)
        .collect();
    Ok(Json(DataResponse {
        data: QuizDetail { quiz, questions },
    }))
}

/// POST /api/lessons/{lesson_id}/quizzes
pub async fn create(
    RequireInstructor(_user): RequireInstructor,
    State(state): State<AppState>,
    Path(lesson_id): Path<DbId>,
    Json(input): Json<CreateQuiz>,
) -> AppResult<impl IntoResponse> {
    require_non_blank("title", &input.title)?;
    if let Some(mark) = input.pass_mark_percent {
        validate_pass_mark(mark)?;
    }
    ensure_lesson_exists(&state.pool, lesson_id).await?;
    let quiz = QuizRepo::create(&state.pool, lesson_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: quiz })))
}

/// PUT /api/quizzes/{id}
pub async fn update(
    RequireInstructor(_user): RequireInstructor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateQuiz>,
) -> AppResult<impl IntoResponse> {
    if let Some(title) = &input.title {
        require_non_blank("title", title)?;
    }
    if let Some(mark) = input.pass_mark_percent {
        validate_pass_mark(mark)?;
    }
    let quiz = QuizRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Quiz", id }))?;
    Ok(Json(DataResponse { data: quiz }))
}

/// DELETE /api/quizzes/{id}
pub async fn delete(
    RequireInstructor(_user): RequireInstructor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !QuizRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Quiz", id }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/quizzes/{id}/attempts
///
/// Score the caller's answers against the stored correct indices and keep
/// the attempt. Answer `i` is matched to question `i` in position order;
/// unanswered questions count as wrong.
pub async fn submit_attempt(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SubmitAttempt>,
) -> AppResult<impl IntoResponse> {
    let quiz = ensure_quiz_visible(&state.pool, id, Some(&user)).await?;
    let questions = QuestionRepo::list_by_quiz(&state.pool, id).await?;
    if questions.is_empty() {
        return Err(AppError::Core(CoreError::Conflict(
            "This quiz has no questions yet".into(),
        )));
    }
    let correct: Vec<i64> = questions.iter().map(|q| q.correct_index).collect();
    let score = score_attempt(&correct, &input.answers, quiz.pass_mark_percent);
    let attempt =
        QuizAttemptRepo::create(&state.pool, id, user.user_id, &input.answers, &score).await?;

    tracing::info!(
        quiz_id = id,
        user_id = user.user_id,
        score_percent = score.score_percent,
        passed = score.passed,
        "Quiz attempt scored"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: AttemptResult {
                attempt_id: attempt.id,
                correct: score.correct,
                total: score.total,
                score_percent: score.score_percent,
                passed: score.passed,
                pass_mark_percent: quiz.pass_mark_percent,
            },
        }),
    ))
}

/// GET /api/quizzes/{id}/attempts
///
/// The caller's own attempts, newest first.
pub async fn list_attempts(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_quiz_exists(&state.pool, id).await?;
    let attempts = QuizAttemptRepo::list_for_user(&state.pool, id, user.user_id).await?;
    Ok(Json(DataResponse { data: attempts }))
}
