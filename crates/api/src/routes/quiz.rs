//! Route definitions for the `/quizzes` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::{question, quiz};
use crate::state::AppState;

/// Routes mounted at `/quizzes`.
///
/// ```text
/// GET    /{id}                 -> get
/// PUT    /{id}                 -> update
/// DELETE /{id}                 -> delete
/// GET    /{id}/attempts        -> list_attempts
/// POST   /{id}/attempts        -> submit_attempt
///
/// GET    /{quiz_id}/questions  -> question::list_by_quiz
/// POST   /{quiz_id}/questions  -> question::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(quiz::get).put(quiz::update).delete(quiz::delete),
        )
        .route(
            "/{id}/attempts",
            get(quiz::list_attempts).post(quiz::submit_attempt),
        )
        .route(
            "/{quiz_id}/questions",
            get(question::list_by_quiz).post(question::create),
        )
}
