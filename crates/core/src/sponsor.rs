//! Sponsor placement slots and scheduling windows.

use crate::error::CoreError;
use crate::types::Timestamp;

pub const SLOT_DASHBOARD_BANNER: &str = "dashboard_banner";
pub const SLOT_LESSON_FOOTER: &str = "lesson_footer";
pub const SLOT_TRACK_SIDEBAR: &str = "track_sidebar";
pub const SLOT_NEWSLETTER: &str = "newsletter";

/// All valid placement slots.
pub const VALID_SLOTS: &[&str] = &[
    SLOT_DASHBOARD_BANNER,
    SLOT_LESSON_FOOTER,
    SLOT_TRACK_SIDEBAR,
    SLOT_NEWSLETTER,
];

pub fn validate_slot(slot: &str) -> Result<(), CoreError> {
    crate::error::require_one_of("slot", slot, VALID_SLOTS)
}

/// A placement window must end after it starts; an open end runs forever.
pub fn validate_window(starts_at: Timestamp, ends_at: Option<Timestamp>) -> Result<(), CoreError> {
    match ends_at {
        Some(end) if end <= starts_at => Err(CoreError::Validation(
            "ends_at must be after starts_at".into(),
        )),
        _ => Ok(()),
    }
}

/// Only http(s) call-to-action links are accepted.
pub fn validate_cta_url(url: &str) -> Result<(), CoreError> {
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "cta_url must be an http(s) URL, got '{url}'"
        )))
    }
}
