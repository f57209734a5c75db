//! Well-known role name constants.
//!
//! These must match the `CHECK` constraint on `users.role`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_INSTRUCTOR: &str = "instructor";
pub const ROLE_STUDENT: &str = "student";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_INSTRUCTOR, ROLE_STUDENT];

/// Whether the role may author course content, decks and equipment records.
pub fn can_author(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_INSTRUCTOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authoring_roles() {
        assert!(can_author(ROLE_ADMIN));
        assert!(can_author(ROLE_INSTRUCTOR));
        assert!(!can_author(ROLE_STUDENT));
        assert!(!can_author("guest"));
    }
}
