//! Admin-only handlers: user roles and the content-integrity audit.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use fathom_core::error::{require_one_of, CoreError};
use fathom_core::roles::VALID_ROLES;
use fathom_core::types::DbId;
use fathom_db::models::user::UserResponse;
use fathom_db::repositories::UserRepo;
use serde::Deserialize;

use crate::audit::run_content_audit;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /admin/users/{id}/role`.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

/// `?regenerate=true` on the content audit.
#[derive(Debug, Deserialize)]
pub struct ContentAuditParams {
    #[serde(default)]
    pub regenerate: bool,
}

/// GET /api/admin/users
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let users = UserRepo::list(&state.pool).await?;
    let data: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();
    Ok(Json(DataResponse { data }))
}

/// PUT /api/admin/users/{id}/role
///
/// Admins cannot change their own role, so the last admin cannot lock
/// everyone out by accident.
pub async fn update_user_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRoleRequest>,
) -> AppResult<impl IntoResponse> {
    require_one_of("role", &input.role, VALID_ROLES)?;
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Conflict(
            "Admins cannot change their own role".into(),
        )));
    }

    let user = UserRepo::update_role(&state.pool, id, &input.role)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(admin_id = admin.user_id, user_id = id, role = %input.role, "User role changed");
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// POST /api/admin/content-audit?regenerate=false
///
/// Scan course content for structural gaps and missing media. With
/// `regenerate=true` missing media is regenerated before the report is
/// returned, which requires a configured generation service.
pub async fn content_audit(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ContentAuditParams>,
) -> AppResult<impl IntoResponse> {
    let runner = if params.regenerate {
        Some(state.generation.as_deref().ok_or_else(|| {
            AppError::ServiceUnavailable("Media generation service is not configured".into())
        })?)
    } else {
        None
    };

    tracing::info!(admin_id = admin.user_id, regenerate = params.regenerate, "Content audit requested");
    let report = run_content_audit(&state.pool, &state.config.media_dir, runner).await?;
    Ok(Json(DataResponse { data: report }))
}
