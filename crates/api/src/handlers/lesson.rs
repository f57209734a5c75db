//! Handlers for lessons, nested under tracks for listing and creation, plus
//! media generation.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fathom_core::error::{require_non_blank, CoreError};
use fathom_core::generation::GenerationKind;
use fathom_core::types::DbId;
use fathom_db::models::lesson::{CreateLesson, Lesson, UpdateLesson};
use fathom_db::repositories::LessonRepo;
use fathom_db::DbPool;
use serde::{Deserialize, Serialize};

use super::track::{ensure_track_exists, ensure_track_visible};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::middleware::rbac::RequireInstructor;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /lessons/{id}/generate`.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub kind: GenerationKind,
}

/// Returned with 202 when a generation job has been started.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStarted {
    pub generation_id: String,
    pub lesson_id: DbId,
    pub kind: GenerationKind,
}

pub(crate) async fn ensure_lesson_exists(pool: &DbPool, id: DbId) -> AppResult<Lesson> {
    LessonRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Lesson", id }))
}

/// Load a lesson whose track the viewer may see.
pub(crate) async fn ensure_lesson_visible(
    pool: &DbPool,
    id: DbId,
    viewer: Option<&AuthUser>,
) -> AppResult<Lesson> {
    let lesson = ensure_lesson_exists(pool, id).await?;
    ensure_track_visible(pool, lesson.track_id, viewer)
        .await
        .map_err(|_| AppError::Core(CoreError::NotFound { entity: "Lesson", id }))?;
    Ok(lesson)
}

/// GET /api/tracks/{track_id}/lessons
pub async fn list_by_track(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(track_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_track_visible(&state.pool, track_id, viewer.as_ref()).await?;
    let lessons = LessonRepo::list_by_track(&state.pool, track_id).await?;
    Ok(Json(DataResponse { data: lessons }))
}

/// GET /api/lessons/{id}
pub async fn get(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let lesson = ensure_lesson_visible(&state.pool, id, viewer.as_ref()).await?;
    Ok(Json(DataResponse { data: lesson }))
}

/// POST /api/tracks/{track_id}/lessons
pub async fn create(
    RequireInstructor(_user): RequireInstructor,
    State(state): State<AppState>,
    Path(track_id): Path<DbId>,
    Json(input): Json<CreateLesson>,
) -> AppResult<impl IntoResponse> {
    require_non_blank("title", &input.title)?;
    ensure_track_exists(&state.pool, track_id).await?;
    let lesson = LessonRepo::create(&state.pool, track_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: lesson })))
}

/// PUT /api/lessons/{id}
pub async fn update(
    RequireInstructor(_user): RequireInstructor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateLesson>,
) -> AppResult<impl IntoResponse> {
    if let Some(title) = &input.title {
        require_non_blank("title", title)?;
    }
    let lesson = LessonRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Lesson", id }))?;
    Ok(Json(DataResponse { data: lesson }))
}

/// DELETE /api/lessons/{id}
pub async fn delete(
    RequireInstructor(_user): RequireInstructor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !LessonRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Lesson", id }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/lessons/{id}/generate
///
/// Start generating a PDF handout or podcast for the lesson. Returns 202
/// with the generation id; progress is pushed on `/ws/generation-progress`.
pub async fn generate(
    RequireInstructor(user): RequireInstructor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<GenerateRequest>,
) -> AppResult<impl IntoResponse> {
    let runner = state.generation.as_ref().ok_or_else(|| {
        AppError::ServiceUnavailable("Media generation service is not configured".into())
    })?;
    ensure_lesson_exists(&state.pool, id).await?;

    let generation_id = runner.spawn(id, input.kind);
    tracing::info!(
        lesson_id = id,
        kind = input.kind.as_str(),
        generation_id = %generation_id,
        user_id = user.user_id,
        "Generation requested"
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: GenerationStarted {
                generation_id,
                lesson_id: id,
                kind: input.kind,
            },
        }),
    ))
}
