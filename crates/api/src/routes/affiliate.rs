//! Route definitions for the `/affiliates` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::affiliate;
use crate::state::AppState;

/// Routes mounted at `/affiliates`.
///
/// ```text
/// GET    /                  -> list
/// POST   /                  -> create
/// POST   /track             -> track (public)
/// GET    /{id}              -> get
/// PUT    /{id}              -> update
/// DELETE /{id}              -> delete
/// GET    /{id}/referrals    -> list_referrals
/// GET    /{id}/summary      -> summary
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(affiliate::list).post(affiliate::create))
        .route("/track", post(affiliate::track))
        .route(
            "/{id}",
            get(affiliate::get)
                .put(affiliate::update)
                .delete(affiliate::delete),
        )
        .route("/{id}/referrals", get(affiliate::list_referrals))
        .route("/{id}/summary", get(affiliate::summary))
}
