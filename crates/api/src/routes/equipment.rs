//! Route definitions for the `/equipment` resource.
//!
//! Use logs and maintenance tasks for an item are nested under it.

use axum::routing::get;
use axum::Router;

use crate::handlers::{equipment, maintenance};
use crate::state::AppState;

/// Routes mounted at `/equipment`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// GET    /{id}                      -> get
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete
/// GET    /{id}/use-logs             -> list_use_logs
/// POST   /{id}/use-logs             -> create_use_log
/// GET    /{id}/maintenance-tasks    -> maintenance::list_by_equipment
/// POST   /{id}/maintenance-tasks    -> maintenance::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(equipment::list).post(equipment::create))
        .route(
            "/{id}",
            get(equipment::get)
                .put(equipment::update)
                .delete(equipment::delete),
        )
        .route(
            "/{id}/use-logs",
            get(equipment::list_use_logs).post(equipment::create_use_log),
        )
        .route(
            "/{id}/maintenance-tasks",
            get(maintenance::list_by_equipment).post(maintenance::create),
        )
}
