//! Dive equipment, maintenance tasks, and use logs.

use fathom_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Equipment items
// ---------------------------------------------------------------------------

/// A row from the `equipment_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EquipmentItem {
    pub id: DbId,
    pub name: String,
    pub category: String,
    pub serial_number: Option<String>,
    pub status: String,
    /// Days between scheduled services; `None` means no recurring schedule.
    pub maintenance_interval_days: Option<i64>,
    pub last_maintained_at: Option<Timestamp>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEquipmentItem {
    pub name: String,
    pub category: String,
    pub serial_number: Option<String>,
    pub maintenance_interval_days: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEquipmentItem {
    pub name: Option<String>,
    pub category: Option<String>,
    pub serial_number: Option<String>,
    pub status: Option<String>,
    pub maintenance_interval_days: Option<i64>,
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Maintenance tasks
// ---------------------------------------------------------------------------

/// A row from the `maintenance_tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MaintenanceTask {
    pub id: DbId,
    pub equipment_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub due_at: Timestamp,
    pub status: String,
    pub completed_at: Option<Timestamp>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMaintenanceTask {
    pub title: String,
    pub description: Option<String>,
    pub due_at: Timestamp,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CloseMaintenanceTask {
    pub notes: Option<String>,
}

/// Everything written by a task completion.
#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceCompletion {
    pub task: MaintenanceTask,
    pub item: EquipmentItem,
    /// Follow-up task scheduled from the item's interval, if it has one.
    pub next_task: Option<MaintenanceTask>,
}

// ---------------------------------------------------------------------------
// Use logs
// ---------------------------------------------------------------------------

/// A row from the `equipment_use_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EquipmentUseLog {
    pub id: DbId,
    pub equipment_id: DbId,
    pub user_id: Option<DbId>,
    pub used_at: Timestamp,
    pub duration_minutes: i64,
    pub max_depth_m: Option<f64>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEquipmentUseLog {
    /// Defaults to now.
    pub used_at: Option<Timestamp>,
    pub duration_minutes: i64,
    pub max_depth_m: Option<f64>,
    pub notes: Option<String>,
}
