//! Dive equipment status and maintenance scheduling rules.

use chrono::Duration;

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Equipment status
// ---------------------------------------------------------------------------

pub const STATUS_IN_SERVICE: &str = "in_service";
pub const STATUS_MAINTENANCE_DUE: &str = "maintenance_due";
pub const STATUS_OUT_OF_SERVICE: &str = "out_of_service";
pub const STATUS_RETIRED: &str = "retired";

/// All valid equipment statuses.
pub const VALID_EQUIPMENT_STATUSES: &[&str] = &[
    STATUS_IN_SERVICE,
    STATUS_MAINTENANCE_DUE,
    STATUS_OUT_OF_SERVICE,
    STATUS_RETIRED,
];

/// Validate a requested status change. `retired` is final.
pub fn validate_status_change(from: &str, to: &str) -> Result<(), CoreError> {
    crate::error::require_one_of("equipment status", to, VALID_EQUIPMENT_STATUSES)?;
    if from == STATUS_RETIRED && to != STATUS_RETIRED {
        return Err(CoreError::Conflict(
            "Retired equipment cannot return to service".into(),
        ));
    }
    Ok(())
}

/// Status an item should carry after a maintenance task is completed.
///
/// Only `maintenance_due` is cleared; an item taken out of service stays
/// out until someone changes it explicitly.
pub fn status_after_maintenance(current: &str) -> &str {
    if current == STATUS_MAINTENANCE_DUE {
        STATUS_IN_SERVICE
    } else {
        current
    }
}

/// Whether a use log may be recorded against an item in `status`.
pub fn accepts_use(status: &str) -> bool {
    status != STATUS_RETIRED
}

// ---------------------------------------------------------------------------
// Maintenance task status
// ---------------------------------------------------------------------------

pub const TASK_PENDING: &str = "pending";
pub const TASK_COMPLETED: &str = "completed";
pub const TASK_SKIPPED: &str = "skipped";

/// Only pending tasks can be completed or skipped.
pub fn ensure_task_pending(status: &str) -> Result<(), CoreError> {
    if status != TASK_PENDING {
        return Err(CoreError::Conflict(format!(
            "Maintenance task is already {status}"
        )));
    }
    Ok(())
}

/// Due date of the follow-up task created when a task is completed.
///
/// Returns `None` when the item has no maintenance interval or the date
/// would be out of range.
pub fn next_maintenance_due(completed_at: Timestamp, interval_days: Option<i64>) -> Option<Timestamp> {
    interval_days
        .filter(|d| (1..=MAX_INTERVAL_DAYS).contains(d))
        .and_then(|d| completed_at.checked_add_signed(Duration::days(d)))
}

/// Ten years; mirrored by the `equipment_items` CHECK constraint.
pub const MAX_INTERVAL_DAYS: i64 = 3650;

pub fn validate_interval_days(interval_days: Option<i64>) -> Result<(), CoreError> {
    match interval_days {
        Some(d) if !(1..=MAX_INTERVAL_DAYS).contains(&d) => Err(CoreError::Validation(format!(
            "maintenance_interval_days must be between 1 and {MAX_INTERVAL_DAYS}"
        ))),
        _ => Ok(()),
    }
}

pub fn validate_use_duration(duration_minutes: i64) -> Result<(), CoreError> {
    if duration_minutes <= 0 {
        return Err(CoreError::Validation(
            "duration_minutes must be positive".into(),
        ));
    }
    Ok(())
}
