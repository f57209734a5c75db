//! Role gates for handlers.
//!
//! Three tiers: any signed-in diver, course authors (instructors and
//! admins), and admins. A request that authenticates but misses its tier is
//! rejected with 403; one that does not authenticate is rejected with 401 by
//! [`AuthUser`] before the tier is looked at.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use fathom_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticate, then keep the user only if `allowed` accepts them.
async fn gate(
    parts: &mut Parts,
    state: &AppState,
    allowed: fn(&AuthUser) -> bool,
    denied: &'static str,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if allowed(&user) {
        Ok(user)
    } else {
        tracing::debug!(user_id = user.user_id, role = %user.role, denied, "Role gate rejected request");
        Err(AppError::Core(CoreError::Forbidden(denied.into())))
    }
}

/// Admin only: user management, sponsors, affiliates, audits.
///
/// ```ignore
/// async fn purge(RequireAdmin(admin): RequireAdmin) -> AppResult<StatusCode> { .. }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        gate(parts, state, AuthUser::is_admin, "Admin role required")
            .await
            .map(Self)
    }
}

/// Course authors: writes to tracks, lessons, quizzes, equipment and
/// maintenance.
pub struct RequireInstructor(pub AuthUser);

impl FromRequestParts<AppState> for RequireInstructor {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        gate(parts, state, AuthUser::is_author, "Instructor or admin role required")
            .await
            .map(Self)
    }
}

/// Any signed-in user.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        gate(parts, state, |_| true, "").await.map(Self)
    }
}
