//! Handlers for equipment maintenance tasks.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, Utc};
use fathom_core::equipment::ensure_task_pending;
use fathom_core::error::{require_non_blank, CoreError};
use fathom_core::types::DbId;
use fathom_db::models::equipment::{CloseMaintenanceTask, CreateMaintenanceTask, MaintenanceTask};
use fathom_db::repositories::MaintenanceTaskRepo;
use fathom_db::DbPool;

use super::equipment::ensure_equipment_exists;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireInstructor};
use crate::query::WithinDaysParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Look-ahead for the upcoming-maintenance list when none is given.
const DEFAULT_WITHIN_DAYS: i64 = 7;
const MAX_WITHIN_DAYS: i64 = 365;

async fn ensure_task_exists(pool: &DbPool, id: DbId) -> AppResult<MaintenanceTask> {
    MaintenanceTaskRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "MaintenanceTask", id }))
}

/// GET /api/equipment/{id}/maintenance-tasks
pub async fn list_by_equipment(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_equipment_exists(&state.pool, id).await?;
    let tasks = MaintenanceTaskRepo::list_by_equipment(&state.pool, id).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// POST /api/equipment/{id}/maintenance-tasks
pub async fn create(
    RequireInstructor(_user): RequireInstructor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateMaintenanceTask>,
) -> AppResult<impl IntoResponse> {
    require_non_blank("title", &input.title)?;
    ensure_equipment_exists(&state.pool, id).await?;
    let task = MaintenanceTaskRepo::create(&state.pool, id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// GET /api/maintenance-tasks/due?within_days=7
///
/// Pending tasks due within the window, overdue ones included.
pub async fn due(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<WithinDaysParams>,
) -> AppResult<impl IntoResponse> {
    let days = params
        .within_days
        .unwrap_or(DEFAULT_WITHIN_DAYS)
        .clamp(0, MAX_WITHIN_DAYS);
    let until = Utc::now() + Duration::days(days);
    let tasks = MaintenanceTaskRepo::list_due(&state.pool, until).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// POST /api/maintenance-tasks/{id}/complete
///
/// Completes the task, stamps the item's `last_maintained_at`, clears a
/// `maintenance_due` status and schedules the follow-up task when the item
/// has a maintenance interval. All in one transaction.
pub async fn complete(
    RequireInstructor(user): RequireInstructor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Option<Json<CloseMaintenanceTask>>,
) -> AppResult<impl IntoResponse> {
    let input = body.map(|Json(b)| b).unwrap_or_default();
    let task = ensure_task_exists(&state.pool, id).await?;
    ensure_task_pending(&task.status)?;

    // A concurrent completion can still win between the check and the write.
    let completion =
        MaintenanceTaskRepo::complete(&state.pool, id, input.notes.as_deref(), Utc::now())
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Conflict("Maintenance task is no longer pending".into()))
            })?;

    tracing::info!(
        task_id = id,
        equipment_id = completion.item.id,
        next_task_id = completion.next_task.as_ref().map(|t| t.id),
        user_id = user.user_id,
        "Maintenance task completed"
    );
    Ok(Json(DataResponse { data: completion }))
}

/// POST /api/maintenance-tasks/{id}/skip
///
/// Marks a pending task as skipped. The item's maintenance date is left
/// unchanged and no follow-up is scheduled.
pub async fn skip(
    RequireInstructor(user): RequireInstructor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Option<Json<CloseMaintenanceTask>>,
) -> AppResult<impl IntoResponse> {
    let input = body.map(|Json(b)| b).unwrap_or_default();
    let task = ensure_task_exists(&state.pool, id).await?;
    ensure_task_pending(&task.status)?;

    let skipped = MaintenanceTaskRepo::skip(&state.pool, id, input.notes.as_deref())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict("Maintenance task is no longer pending".into()))
        })?;

    tracing::info!(task_id = id, user_id = user.user_id, "Maintenance task skipped");
    Ok((StatusCode::OK, Json(DataResponse { data: skipped })))
}
