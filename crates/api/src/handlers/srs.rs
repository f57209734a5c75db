//! Handlers for spaced-repetition decks, cards and reviews.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use fathom_core::error::{require_non_blank, CoreError};
use fathom_core::pagination::clamp_limit;
use fathom_core::srs::{schedule, ReviewState};
use fathom_core::types::DbId;
use fathom_db::models::srs::{
    CreateSrsCard, CreateSrsDeck, SrsCard, SrsDeck, SubmitReview, UpdateSrsCard, UpdateSrsDeck,
};
use fathom_db::repositories::{SrsCardRepo, SrsDeckRepo, SrsReviewRepo};
use fathom_db::DbPool;

use super::track::ensure_track_exists;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireInstructor};
use crate::query::{LimitParams, TrackFilterParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Default and maximum size of one review session.
const DEFAULT_DUE_LIMIT: i64 = 20;
const MAX_DUE_LIMIT: i64 = 100;

async fn ensure_deck_exists(pool: &DbPool, id: DbId) -> AppResult<SrsDeck> {
    SrsDeckRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Deck", id }))
}

async fn ensure_card_exists(pool: &DbPool, id: DbId) -> AppResult<SrsCard> {
    SrsCardRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Card", id }))
}

// ---------------------------------------------------------------------------
// Decks
// ---------------------------------------------------------------------------

/// GET /api/srs/decks?track_id=
pub async fn list_decks(
    State(state): State<AppState>,
    Query(params): Query<TrackFilterParams>,
) -> AppResult<impl IntoResponse> {
    let decks = SrsDeckRepo::list(&state.pool, params.track_id).await?;
    Ok(Json(DataResponse { data: decks }))
}

/// GET /api/srs/decks/{id}
pub async fn get_deck(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deck = ensure_deck_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: deck }))
}

/// POST /api/srs/decks
pub async fn create_deck(
    RequireInstructor(_user): RequireInstructor,
    State(state): State<AppState>,
    Json(input): Json<CreateSrsDeck>,
) -> AppResult<impl IntoResponse> {
    require_non_blank("name", &input.name)?;
    if let Some(track_id) = input.track_id {
        ensure_track_exists(&state.pool, track_id).await?;
    }
    let deck = SrsDeckRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: deck })))
}

/// PUT /api/srs/decks/{id}
pub async fn update_deck(
    RequireInstructor(_user): RequireInstructor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSrsDeck>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        require_non_blank("name", name)?;
    }
    if let Some(track_id) = input.track_id {
        ensure_track_exists(&state.pool, track_id).await?;
    }
    let deck = SrsDeckRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Deck", id }))?;
    Ok(Json(DataResponse { data: deck }))
}

/// DELETE /api/srs/decks/{id}
pub async fn delete_deck(
    RequireInstructor(_user): RequireInstructor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !SrsDeckRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Deck", id }));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

/// GET /api/srs/decks/{deck_id}/cards
pub async fn list_cards(
    State(state): State<AppState>,
    Path(deck_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_deck_exists(&state.pool, deck_id).await?;
    let cards = SrsCardRepo::list_by_deck(&state.pool, deck_id).await?;
    Ok(Json(DataResponse { data: cards }))
}

/// POST /api/srs/decks/{deck_id}/cards
pub async fn create_card(
    RequireInstructor(_user): RequireInstructor,
    State(state): State<AppState>,
    Path(deck_id): Path<DbId>,
    Json(input): Json<CreateSrsCard>,
) -> AppResult<impl IntoResponse> {
    require_non_blank("front", &input.front)?;
    require_non_blank("back", &input.back)?;
    ensure_deck_exists(&state.pool, deck_id).await?;
    let card = SrsCardRepo::create(&state.pool, deck_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: card })))
}

/// PUT /api/srs/cards/{id}
pub async fn update_card(
    RequireInstructor(_user): RequireInstructor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSrsCard>,
) -> AppResult<impl IntoResponse> {
    if let Some(front) = &input.front {
        require_non_blank("front", front)?;
    }
    if let Some(back) = &input.back {
        require_non_blank("back", back)?;
    }
    let card = SrsCardRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Card", id }))?;
    Ok(Json(DataResponse { data: card }))
}

/// DELETE /api/srs/cards/{id}
pub async fn delete_card(
    RequireInstructor(_user): RequireInstructor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !SrsCardRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Card", id }));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

/// GET /api/srs/decks/{deck_id}/due?limit=20
///
/// Cards the caller should review now: never-seen cards and cards whose
/// due date has passed, earliest first.
pub async fn due(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(deck_id): Path<DbId>,
    Query(params): Query<LimitParams>,
) -> AppResult<impl IntoResponse> {
    ensure_deck_exists(&state.pool, deck_id).await?;
    let limit = clamp_limit(params.limit, DEFAULT_DUE_LIMIT, MAX_DUE_LIMIT);
    let cards = SrsReviewRepo::list_due(&state.pool, deck_id, user.user_id, Utc::now(), limit).await?;
    Ok(Json(DataResponse { data: cards }))
}

/// POST /api/srs/review
///
/// Grade one card. The next due date is scheduled from the caller's
/// previous state for the card (or a fresh state) and persisted together
/// with a review log entry.
pub async fn review(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<SubmitReview>,
) -> AppResult<impl IntoResponse> {
    ensure_card_exists(&state.pool, input.card_id).await?;

    let previous = SrsReviewRepo::find_state(&state.pool, user.user_id, input.card_id).await?;
    let prev_state = previous
        .as_ref()
        .map_or_else(ReviewState::new_card, |s| s.state());
    let now = Utc::now();
    let scheduled = schedule(&prev_state, input.grade, now);

    let saved = SrsReviewRepo::record_review(
        &state.pool,
        user.user_id,
        input.card_id,
        input.grade,
        &scheduled,
        previous.as_ref().map(|s| s.due_at),
        now,
    )
    .await?;

    tracing::debug!(
        user_id = user.user_id,
        card_id = input.card_id,
        grade = input.grade.as_str(),
        interval_days = saved.interval_days,
        "Card reviewed"
    );
    Ok(Json(DataResponse { data: saved }))
}

/// GET /api/srs/decks/{deck_id}/stats
pub async fn stats(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(deck_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_deck_exists(&state.pool, deck_id).await?;
    let stats = SrsReviewRepo::deck_stats(&state.pool, deck_id, user.user_id, Utc::now()).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/srs/cards/{id}/history
///
/// The caller's review log for one card, newest first.
pub async fn history(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_card_exists(&state.pool, id).await?;
    let logs = SrsReviewRepo::list_logs(&state.pool, user.user_id, id).await?;
    Ok(Json(DataResponse { data: logs }))
}
