//! Route definitions for the `/tracks` resource.
//!
//! Lessons are created and listed under `/tracks/{track_id}/lessons`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{lesson, track};
use crate::state::AppState;

/// Routes mounted at `/tracks`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// GET    /by-slug/{slug}            -> get_by_slug
/// GET    /{id}                      -> get
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete
///
/// GET    /{track_id}/lessons        -> lesson::list_by_track
/// POST   /{track_id}/lessons        -> lesson::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(track::list).post(track::create))
        .route("/by-slug/{slug}", get(track::get_by_slug))
        .route(
            "/{id}",
            get(track::get).put(track::update).delete(track::delete),
        )
        .route(
            "/{track_id}/lessons",
            get(lesson::list_by_track).post(lesson::create),
        )
}
