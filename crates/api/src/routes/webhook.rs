//! Route definitions for inbound payment webhooks.
//!
//! These routes carry no bearer auth; each request is authenticated by its
//! provider signature instead.

use axum::routing::post;
use axum::Router;

use crate::handlers::webhook;
use crate::state::AppState;

/// Routes mounted at `/webhooks`.
///
/// ```text
/// POST /stripe   -> stripe
/// POST /revolut  -> revolut
/// POST /paypal   -> paypal
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stripe", post(webhook::stripe))
        .route("/revolut", post(webhook::revolut))
        .route("/paypal", post(webhook::paypal))
}
