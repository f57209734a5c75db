use crate::types::DbId;

/// Domain error shared by every layer above `fathom-core`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Lookup by a natural key (slug, code, generation id).
    #[error("{entity} '{key}' not found")]
    NotFoundByKey { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Reject `value` if it is blank after trimming.
pub fn require_non_blank(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Reject `value` if it is one of `allowed`.
pub fn require_one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), CoreError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown {field}: '{value}'. Valid values: {}",
            allowed.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_rejected() {
        assert!(require_non_blank("title", "  ").is_err());
        assert!(require_non_blank("title", "Surface supply").is_ok());
    }

    #[test]
    fn one_of_lists_valid_values() {
        let err = require_one_of("slot", "popup", &["a", "b"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: Unknown slot: 'popup'. Valid values: a, b"
        );
        assert!(require_one_of("slot", "a", &["a", "b"]).is_ok());
    }

    #[test]
    fn not_found_message() {
        let err = CoreError::NotFound { entity: "Track", id: 7 };
        assert_eq!(err.to_string(), "Track with id 7 not found");
    }
}
