//! Handlers for the `/tracks` resource.
//!
//! Unpublished tracks are only visible to instructors and admins; everyone
//! else gets 404 as if the track did not exist.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fathom_core::course::validate_difficulty;
use fathom_core::error::{require_non_blank, CoreError};
use fathom_core::slug::{slugify, validate_slug};
use fathom_core::types::DbId;
use fathom_db::models::track::{CreateTrack, Track, UpdateTrack};
use fathom_db::repositories::TrackRepo;
use fathom_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::middleware::rbac::RequireInstructor;
use crate::query::IncludeUnpublishedParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a track, hiding unpublished ones from non-authors.
pub(crate) async fn ensure_track_visible(
    pool: &DbPool,
    id: DbId,
    viewer: Option<&AuthUser>,
) -> AppResult<Track> {
    let track = TrackRepo::find_by_id(pool, id)
        .await?
        .filter(|t| t.is_published || viewer.is_some_and(AuthUser::is_author))
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Track", id }))?;
    Ok(track)
}

pub(crate) async fn ensure_track_exists(pool: &DbPool, id: DbId) -> AppResult<Track> {
    TrackRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Track", id }))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/tracks?include_unpublished=false
///
/// `include_unpublished` is ignored for callers who cannot author.
pub async fn list(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Query(params): Query<IncludeUnpublishedParams>,
) -> AppResult<impl IntoResponse> {
    let include = params.include_unpublished && viewer.as_ref().is_some_and(AuthUser::is_author);
    let tracks = TrackRepo::list(&state.pool, include).await?;
    Ok(Json(DataResponse { data: tracks }))
}

/// GET /api/tracks/{id}
pub async fn get(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let track = ensure_track_visible(&state.pool, id, viewer.as_ref()).await?;
    Ok(Json(DataResponse { data: track }))
}

/// GET /api/tracks/by-slug/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let author = viewer.as_ref().is_some_and(AuthUser::is_author);
    let track = TrackRepo::find_by_slug(&state.pool, &slug)
        .await?
        .filter(|t| t.is_published || author)
        .ok_or(AppError::Core(CoreError::NotFoundByKey {
            entity: "Track",
            key: slug,
        }))?;
    Ok(Json(DataResponse { data: track }))
}

/// POST /api/tracks
///
/// Create a track. The slug is derived from the title when omitted.
pub async fn create(
    RequireInstructor(user): RequireInstructor,
    State(state): State<AppState>,
    Json(input): Json<CreateTrack>,
) -> AppResult<impl IntoResponse> {
    require_non_blank("title", &input.title)?;
    if let Some(difficulty) = &input.difficulty {
        validate_difficulty(difficulty)?;
    }
    let slug = match &input.slug {
        Some(slug) => {
            validate_slug(slug)?;
            slug.clone()
        }
        None => slugify(&input.title)?,
    };

    if TrackRepo::find_by_slug(&state.pool, &slug).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "A track with slug '{slug}' already exists"
        ))));
    }

    let track = TrackRepo::create(&state.pool, &input, &slug).await?;
    tracing::info!(track_id = track.id, slug = %track.slug, user_id = user.user_id, "Track created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: track })))
}

/// PUT /api/tracks/{id}
///
/// Update a track. The slug is immutable.
pub async fn update(
    RequireInstructor(_user): RequireInstructor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTrack>,
) -> AppResult<impl IntoResponse> {
    if let Some(title) = &input.title {
        require_non_blank("title", title)?;
    }
    if let Some(difficulty) = &input.difficulty {
        validate_difficulty(difficulty)?;
    }
    let track = TrackRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Track", id }))?;
    Ok(Json(DataResponse { data: track }))
}

/// DELETE /api/tracks/{id}
///
/// Lessons, quizzes and questions go with it.
pub async fn delete(
    RequireInstructor(user): RequireInstructor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !TrackRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Track", id }));
    }
    tracing::info!(track_id = id, user_id = user.user_id, "Track deleted");
    Ok(StatusCode::NO_CONTENT)
}
