//! Route definitions for the `/sponsors` and `/sponsor-placements` resources.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::sponsor;
use crate::state::AppState;

/// Routes mounted at `/sponsors`.
///
/// ```text
/// GET    /                  -> list
/// POST   /                  -> create
/// GET    /{id}              -> get
/// PUT    /{id}              -> update
/// DELETE /{id}              -> delete
/// GET    /{id}/placements   -> list_placements
/// POST   /{id}/placements   -> create_placement
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(sponsor::list).post(sponsor::create))
        .route(
            "/{id}",
            get(sponsor::get).put(sponsor::update).delete(sponsor::delete),
        )
        .route(
            "/{id}/placements",
            get(sponsor::list_placements).post(sponsor::create_placement),
        )
}

/// Routes mounted at `/sponsor-placements`.
///
/// ```text
/// GET    /active   -> active (public)
/// PUT    /{id}     -> update_placement
/// DELETE /{id}     -> delete_placement
/// ```
pub fn placement_router() -> Router<AppState> {
    Router::new()
        .route("/active", get(sponsor::active))
        .route(
            "/{id}",
            put(sponsor::update_placement).delete(sponsor::delete_placement),
        )
}
