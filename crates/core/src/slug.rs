//! URL slug rules for tracks.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Maximum slug length in characters.
pub const MAX_SLUG_LEN: usize = 80;

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug regex is valid"));

/// Validate a caller-supplied slug.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.len() > MAX_SLUG_LEN {
        return Err(CoreError::Validation(format!(
            "Slug must be at most {MAX_SLUG_LEN} characters"
        )));
    }
    if !SLUG_RE.is_match(slug) {
        return Err(CoreError::Validation(format!(
            "Invalid slug '{slug}': use lowercase letters, digits and single hyphens"
        )));
    }
    Ok(())
}

/// Derive a slug from a human title ("Surface-Supplied Diving 101" ->
/// "surface-supplied-diving-101").
///
/// Returns a validation error when the title contains no ASCII
/// alphanumerics at all.
pub fn slugify(title: &str) -> Result<String, CoreError> {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
        while slug.ends_with('-') {
            slug.pop();
        }
    }

    if slug.is_empty() {
        return Err(CoreError::Validation(format!(
            "Cannot derive a slug from title '{title}'"
        )));
    }
    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_slugs_accepted() {
        assert!(validate_slug("air-diving").is_ok());
        assert!(validate_slug("hse-101").is_ok());
    }

    #[test]
    fn invalid_slugs_rejected() {
        assert!(validate_slug("").is_err());
        assert!(validate_slug("Air-Diving").is_err());
        assert!(validate_slug("air--diving").is_err());
        assert!(validate_slug("-air").is_err());
        assert!(validate_slug(&"a".repeat(81)).is_err());
    }

    #[test]
    fn slugify_collapses_punctuation() {
        assert_eq!(
            slugify("Surface-Supplied Diving: 101!").unwrap(),
            "surface-supplied-diving-101"
        );
        assert_eq!(slugify("  Wet Bell  ").unwrap(), "wet-bell");
    }

    #[test]
    fn slugify_output_is_valid() {
        let slug = slugify(&"Deep ".repeat(40)).unwrap();
        assert!(validate_slug(&slug).is_ok());
    }

    #[test]
    fn slugify_rejects_symbol_only_titles() {
        assert!(slugify("!!!").is_err());
    }
}
