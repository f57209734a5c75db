//! Route definitions for the `/payments` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::payment;
use crate::state::AppState;

/// Routes mounted at `/payments`.
///
/// ```text
/// GET /provider -> provider
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/provider", get(payment::provider))
}
