use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fathom_core::error::CoreError;
use serde_json::json;

/// Error type returned by every handler.
///
/// Rendered as `{ "error": <message>, "code": <CODE> }`. Internal details
/// are logged and never sent to the client.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed input that never reached domain validation (bad webhook
    /// JSON and the like).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A dependency (generation service, webhook secret) is not configured.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

type Rendered = (StatusCode, &'static str, String);

fn internal(detail: &dyn std::fmt::Display) -> Rendered {
    tracing::error!(error = %detail, "Internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

fn render_core(err: &CoreError) -> Rendered {
    match err {
        CoreError::NotFound { .. } | CoreError::NotFoundByKey { .. } => {
            (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
        }
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => internal(msg),
    }
}

/// Constraint failures become client errors; anything else is a 500.
///
/// Handlers check the common cases (duplicate slug, taken code) up front
/// with a friendlier message; this is the backstop for races.
fn render_sqlx(err: &sqlx::Error) -> Rendered {
    let sqlx::Error::Database(db_err) = err else {
        return match err {
            sqlx::Error::RowNotFound => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Resource not found".to_string(),
            ),
            other => internal(other),
        };
    };

    if db_err.is_unique_violation() {
        (
            StatusCode::CONFLICT,
            "CONFLICT",
            "Duplicate value violates a unique constraint".to_string(),
        )
    } else if db_err.is_foreign_key_violation() {
        (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "Referenced record does not exist".to_string(),
        )
    } else if db_err.is_check_violation() {
        (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "Value violates a check constraint".to_string(),
        )
    } else {
        internal(db_err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => render_core(core),
            AppError::Database(err) => render_sqlx(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE", msg.clone())
            }
            AppError::InternalError(msg) => internal(msg),
        };

        (status, axum::Json(json!({ "error": message, "code": code }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_statuses() {
        let cases = [
            (CoreError::NotFound { entity: "Track", id: 1 }, StatusCode::NOT_FOUND),
            (
                CoreError::NotFoundByKey { entity: "Affiliate", key: "X".into() },
                StatusCode::NOT_FOUND,
            ),
            (CoreError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (CoreError::Conflict("dup".into()), StatusCode::CONFLICT),
            (CoreError::Unauthorized("no".into()), StatusCode::UNAUTHORIZED),
            (CoreError::Forbidden("no".into()), StatusCode::FORBIDDEN),
            (CoreError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::Core(err).into_response().status(), status);
        }
    }

    #[test]
    fn internal_details_are_not_leaked() {
        let (_, code, message) = render_core(&CoreError::Internal("disk on fire".into()));
        assert_eq!(code, "INTERNAL_ERROR");
        assert!(!message.contains("disk"));
    }

    #[test]
    fn row_not_found_is_404() {
        let resp = AppError::Database(sqlx::Error::RowNotFound).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unconfigured_dependency_is_503() {
        let resp = AppError::ServiceUnavailable("generation".into()).into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
