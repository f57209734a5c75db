//! Route definitions for the `/admin` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{admin, payment};
use crate::state::AppState;

/// Routes mounted at `/admin`. Every handler requires the admin role.
///
/// ```text
/// GET  /users              -> list_users
/// PUT  /users/{id}/role    -> update_user_role
/// POST /content-audit      -> content_audit
/// GET  /payment-events     -> payment::list_events
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users))
        .route("/users/{id}/role", put(admin::update_user_role))
        .route("/content-audit", post(admin::content_audit))
        .route("/payment-events", get(payment::list_events))
}
