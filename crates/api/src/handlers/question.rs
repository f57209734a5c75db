//! Handlers for quiz questions. Everything here is author-only because
//! question rows carry the correct answer.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fathom_core::course::validate_question;
use fathom_core::error::{require_non_blank, CoreError};
use fathom_core::types::DbId;
use fathom_db::models::quiz::{CreateQuestion, UpdateQuestion};
use fathom_db::repositories::QuestionRepo;

use super::quiz::ensure_quiz_exists;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireInstructor;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/quizzes/{quiz_id}/questions
pub async fn list_by_quiz(
    RequireInstructor(_user): RequireInstructor,
    State(state): State<AppState>,
    Path(quiz_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_quiz_exists(&state.pool, quiz_id).await?;
    let questions = QuestionRepo::list_by_quiz(&state.pool, quiz_id).await?;
    Ok(Json(DataResponse { data: questions }))
}

/// POST /api/quizzes/{quiz_id}/questions
pub async fn create(
    RequireInstructor(_user): RequireInstructor,
    State(state): State<AppState>,
    Path(quiz_id): Path<DbId>,
    Json(input): Json<CreateQuestion>,
) -> AppResult<impl IntoResponse> {
    require_non_blank("prompt", &input.prompt)?;
    validate_question(&input.options, input.correct_index)?;
    ensure_quiz_exists(&state.pool, quiz_id).await?;
    let question = QuestionRepo::create(&state.pool, quiz_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: question })))
}

/// PUT /api/questions/{id}
///
/// Options and correct index are validated together against the merged
/// result, so changing only one of them cannot leave the question broken.
pub async fn update(
    RequireInstructor(_user): RequireInstructor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateQuestion>,
) -> AppResult<impl IntoResponse> {
    let existing = QuestionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Question", id }))?;

    if let Some(prompt) = &input.prompt {
        require_non_blank("prompt", prompt)?;
    }
    let options = input.options.as_ref().unwrap_or(&existing.options.0);
    let correct_index = input.correct_index.unwrap_or(existing.correct_index);
    validate_question(options, correct_index)?;

    let question = QuestionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Question", id }))?;
    Ok(Json(DataResponse { data: question }))
}

/// DELETE /api/questions/{id}
pub async fn delete(
    RequireInstructor(_user): RequireInstructor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !QuestionRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Question", id }));
    }
    Ok(StatusCode::NO_CONTENT)
}
