//! Repository for the `equipment_use_logs` table.

use fathom_core::types::{DbId, Timestamp};
use sqlx::SqlitePool;

use crate::models::equipment::{CreateEquipmentUseLog, EquipmentUseLog};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, equipment_id, user_id, used_at, duration_minutes, max_depth_m, notes, created_at";

/// Append-only log of dives and other uses of an item.
pub struct UseLogRepo;

impl UseLogRepo {
    pub async fn create(
        pool: &SqlitePool,
        equipment_id: DbId,
        user_id: Option<DbId>,
        used_at: Timestamp,
        input: &CreateEquipmentUseLog,
    ) -> Result<EquipmentUseLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO equipment_use_logs (equipment_id, user_id, used_at, duration_minutes, max_depth_m, notes)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EquipmentUseLog>(&query)
            .bind(equipment_id)
            .bind(user_id)
            .bind(used_at)
            .bind(input.duration_minutes)
            .bind(input.max_depth_m)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// An item's use history, most recent first.
    pub async fn list_by_equipment(
        pool: &SqlitePool,
        equipment_id: DbId,
    ) -> Result<Vec<EquipmentUseLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM equipment_use_logs
             WHERE equipment_id = $1
             ORDER BY used_at DESC, id DESC"
        );
        sqlx::query_as::<_, EquipmentUseLog>(&query)
            .bind(equipment_id)
            .fetch_all(pool)
            .await
    }
}
