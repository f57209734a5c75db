//! Handlers for equipment items and their use logs.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use fathom_core::equipment::{
    accepts_use, validate_interval_days, validate_status_change, validate_use_duration,
    VALID_EQUIPMENT_STATUSES,
};
use fathom_core::error::{require_non_blank, require_one_of, CoreError};
use fathom_core::types::DbId;
use fathom_db::models::equipment::{
    CreateEquipmentItem, CreateEquipmentUseLog, EquipmentItem, UpdateEquipmentItem,
};
use fathom_db::repositories::{EquipmentRepo, UseLogRepo};
use fathom_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireInstructor};
use crate::query::StatusFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

pub(crate) async fn ensure_equipment_exists(pool: &DbPool, id: DbId) -> AppResult<EquipmentItem> {
    EquipmentRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Equipment", id }))
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// GET /api/equipment?status=
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<StatusFilterParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = &params.status {
        require_one_of("equipment status", status, VALID_EQUIPMENT_STATUSES)?;
    }
    let items = EquipmentRepo::list(&state.pool, params.status.as_deref()).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/equipment/{id}
pub async fn get(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let item = ensure_equipment_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: item }))
}

/// POST /api/equipment
pub async fn create(
    RequireInstructor(_user): RequireInstructor,
    State(state): State<AppState>,
    Json(input): Json<CreateEquipmentItem>,
) -> AppResult<impl IntoResponse> {
    require_non_blank("name", &input.name)?;
    require_non_blank("category", &input.category)?;
    validate_interval_days(input.maintenance_interval_days)?;
    let item = EquipmentRepo::create(&state.pool, &input).await?;
    tracing::info!(equipment_id = item.id, name = %item.name, "Equipment registered");
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// PUT /api/equipment/{id}
///
/// Status changes are validated against the current status; a retired
/// item stays retired.
pub async fn update(
    RequireInstructor(_user): RequireInstructor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEquipmentItem>,
) -> AppResult<impl IntoResponse> {
    let existing = ensure_equipment_exists(&state.pool, id).await?;
    if let Some(status) = &input.status {
        validate_status_change(&existing.status, status)?;
    }
    if let Some(name) = &input.name {
        require_non_blank("name", name)?;
    }
    validate_interval_days(input.maintenance_interval_days)?;

    let item = EquipmentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Equipment", id }))?;
    if existing.status != item.status {
        tracing::info!(equipment_id = id, from = %existing.status, to = %item.status, "Equipment status changed");
    }
    Ok(Json(DataResponse { data: item }))
}

/// DELETE /api/equipment/{id}
pub async fn delete(
    RequireInstructor(_user): RequireInstructor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !EquipmentRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Equipment", id }));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Use logs
// ---------------------------------------------------------------------------

/// GET /api/equipment/{id}/use-logs
pub async fn list_use_logs(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_equipment_exists(&state.pool, id).await?;
    let logs = UseLogRepo::list_by_equipment(&state.pool, id).await?;
    Ok(Json(DataResponse { data: logs }))
}

/// POST /api/equipment/{id}/use-logs
///
/// Any authenticated diver may log a use. Retired items reject new logs.
pub async fn create_use_log(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateEquipmentUseLog>,
) -> AppResult<impl IntoResponse> {
    validate_use_duration(input.duration_minutes)?;
    if input.max_depth_m.is_some_and(|d| d < 0.0) {
        return Err(AppError::Core(CoreError::Validation(
            "max_depth_m must not be negative".into(),
        )));
    }
    let item = ensure_equipment_exists(&state.pool, id).await?;
    if !accepts_use(&item.status) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Equipment '{}' is {} and cannot be used",
            item.name, item.status
        ))));
    }

    let used_at = input.used_at.unwrap_or_else(Utc::now);
    let log = UseLogRepo::create(&state.pool, id, Some(user.user_id), used_at, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: log })))
}
