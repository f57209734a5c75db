//! Limit/offset clamping shared by list endpoints.

/// Default page size when the caller does not pass `limit`.
pub const DEFAULT_LIMIT: i64 = 50;

/// Upper bound for any caller-supplied `limit`.
pub const MAX_LIMIT: i64 = 200;

/// Clamp a user-provided limit into `1..=max`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_bounds() {
        assert_eq!(clamp_limit(None, 50, 200), 50);
        assert_eq!(clamp_limit(Some(0), 50, 200), 1);
        assert_eq!(clamp_limit(Some(-5), 50, 200), 1);
        assert_eq!(clamp_limit(Some(1000), 50, 200), 200);
        assert_eq!(clamp_limit(Some(20), 50, 200), 20);
    }

    #[test]
    fn offset_never_negative() {
        assert_eq!(clamp_offset(None), 0);
        assert_eq!(clamp_offset(Some(-1)), 0);
        assert_eq!(clamp_offset(Some(30)), 30);
    }
}
