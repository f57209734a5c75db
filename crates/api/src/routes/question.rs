//! Route definitions for the `/questions` resource.

use axum::routing::put;
use axum::Router;

use crate::handlers::question;
use crate::state::AppState;

/// Routes mounted at `/questions`.
///
/// ```text
/// PUT    /{id}  -> update
/// DELETE /{id}  -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", put(question::update).delete(question::delete))
}
