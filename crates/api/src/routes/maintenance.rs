//! Route definitions for the `/maintenance-tasks` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::maintenance;
use crate::state::AppState;

/// Routes mounted at `/maintenance-tasks`.
///
/// ```text
/// GET  /due              -> due
/// POST /{id}/complete    -> complete
/// POST /{id}/skip        -> skip
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/due", get(maintenance::due))
        .route("/{id}/complete", post(maintenance::complete))
        .route("/{id}/skip", post(maintenance::skip))
}
