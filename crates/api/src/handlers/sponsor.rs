//! Handlers for sponsors and their placements.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use fathom_core::error::{require_non_blank, CoreError};
use fathom_core::sponsor::{validate_cta_url, validate_slot, validate_window};
use fathom_core::types::DbId;
use fathom_db::models::sponsor::{
    CreateSponsor, CreateSponsorPlacement, Sponsor, UpdateSponsor, UpdateSponsorPlacement,
};
use fathom_db::repositories::{SponsorPlacementRepo, SponsorRepo};
use fathom_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::SlotFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

async fn ensure_sponsor_exists(pool: &DbPool, id: DbId) -> AppResult<Sponsor> {
    SponsorRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Sponsor", id }))
}

// ---------------------------------------------------------------------------
// Sponsors
// ---------------------------------------------------------------------------

/// GET /api/sponsors
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let sponsors = SponsorRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: sponsors }))
}

/// GET /api/sponsors/{id}
pub async fn get(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let sponsor = ensure_sponsor_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: sponsor }))
}

/// POST /api/sponsors
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateSponsor>,
) -> AppResult<impl IntoResponse> {
    require_non_blank("name", &input.name)?;
    let sponsor = SponsorRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: sponsor })))
}

/// PUT /api/sponsors/{id}
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSponsor>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        require_non_blank("name", name)?;
    }
    let sponsor = SponsorRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Sponsor", id }))?;
    Ok(Json(DataResponse { data: sponsor }))
}

/// DELETE /api/sponsors/{id}
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !SponsorRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Sponsor", id }));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Placements
// ---------------------------------------------------------------------------

/// GET /api/sponsors/{id}/placements
pub async fn list_placements(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_sponsor_exists(&state.pool, id).await?;
    let placements = SponsorPlacementRepo::list_by_sponsor(&state.pool, id).await?;
    Ok(Json(DataResponse { data: placements }))
}

/// POST /api/sponsors/{id}/placements
///
/// `starts_at` defaults to now.
pub async fn create_placement(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateSponsorPlacement>,
) -> AppResult<impl IntoResponse> {
    validate_slot(&input.slot)?;
    require_non_blank("cta_text", &input.cta_text)?;
    validate_cta_url(&input.cta_url)?;
    let starts_at = input.starts_at.unwrap_or_else(Utc::now);
    validate_window(starts_at, input.ends_at)?;
    ensure_sponsor_exists(&state.pool, id).await?;

    let placement = SponsorPlacementRepo::create(&state.pool, id, starts_at, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: placement })))
}

/// PUT /api/sponsor-placements/{id}
///
/// The window is validated against the merged start and end.
pub async fn update_placement(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSponsorPlacement>,
) -> AppResult<impl IntoResponse> {
    let existing = SponsorPlacementRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "SponsorPlacement", id }))?;

    if let Some(slot) = &input.slot {
        validate_slot(slot)?;
    }
    if let Some(text) = &input.cta_text {
        require_non_blank("cta_text", text)?;
    }
    if let Some(url) = &input.cta_url {
        validate_cta_url(url)?;
    }
    validate_window(
        input.starts_at.unwrap_or(existing.starts_at),
        input.ends_at.or(existing.ends_at),
    )?;

    let placement = SponsorPlacementRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "SponsorPlacement", id }))?;
    Ok(Json(DataResponse { data: placement }))
}

/// DELETE /api/sponsor-placements/{id}
pub async fn delete_placement(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !SponsorPlacementRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "SponsorPlacement", id }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/sponsor-placements/active?slot=
///
/// Public. Placements currently live for display, highest priority first.
pub async fn active(
    State(state): State<AppState>,
    Query(params): Query<SlotFilterParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(slot) = &params.slot {
        validate_slot(slot)?;
    }
    let placements =
        SponsorPlacementRepo::list_active(&state.pool, params.slot.as_deref(), Utc::now()).await?;
    Ok(Json(DataResponse { data: placements }))
}
