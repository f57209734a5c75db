//! Route definitions for the `/lessons` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{lesson, quiz};
use crate::state::AppState;

/// Routes mounted at `/lessons`.
///
/// ```text
/// GET    /{id}                  -> get
/// PUT    /{id}                  -> update
/// DELETE /{id}                  -> delete
/// POST   /{id}/generate         -> generate
///
/// GET    /{lesson_id}/quizzes   -> quiz::list_by_lesson
/// POST   /{lesson_id}/quizzes   -> quiz::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(lesson::get).put(lesson::update).delete(lesson::delete),
        )
        .route("/{id}/generate", post(lesson::generate))
        .route(
            "/{lesson_id}/quizzes",
            get(quiz::list_by_lesson).post(quiz::create),
        )
}
