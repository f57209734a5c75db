//! Repository for the `equipment_items` table.

use fathom_core::equipment::{STATUS_IN_SERVICE, STATUS_MAINTENANCE_DUE, TASK_PENDING};
use fathom_core::types::{DbId, Timestamp};
use sqlx::SqlitePool;

use crate::models::equipment::{CreateEquipmentItem, EquipmentItem, UpdateEquipmentItem};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, name, category, serial_number, status, \
                                  maintenance_interval_days, last_maintained_at, notes, \
                                  created_at, updated_at";

/// Provides CRUD operations for dive equipment.
pub struct EquipmentRepo;

impl EquipmentRepo {
    /// Insert a new item. Items always start `in_service`.
    pub async fn create(
        pool: &SqlitePool,
        input: &CreateEquipmentItem,
    ) -> Result<EquipmentItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO equipment_items (name, category, serial_number, maintenance_interval_days, notes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EquipmentItem>(&query)
            .bind(&input.name)
            .bind(&input.category)
            .bind(&input.serial_number)
            .bind(input.maintenance_interval_days)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<EquipmentItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM equipment_items WHERE id = $1");
        sqlx::query_as::<_, EquipmentItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List items, optionally filtered by status.
    pub async fn list(
        pool: &SqlitePool,
        status: Option<&str>,
    ) -> Result<Vec<EquipmentItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM equipment_items
             WHERE $1 IS NULL OR status = $1
             ORDER BY name, id"
        );
        sqlx::query_as::<_, EquipmentItem>(&query)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Update an item. Only non-`None` fields in `input` are applied.
    ///
    /// Status transitions are validated by the caller.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateEquipmentItem,
    ) -> Result<Option<EquipmentItem>, sqlx::Error> {
        let query = format!(
            "UPDATE equipment_items SET
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                serial_number = COALESCE($4, serial_number),
                status = COALESCE($5, status),
                maintenance_interval_days = COALESCE($6, maintenance_interval_days),
                notes = COALESCE($7, notes),
                updated_at = CURRENT_TIMESTAMP
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EquipmentItem>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.category)
            .bind(&input.serial_number)
            .bind(&input.status)
            .bind(input.maintenance_interval_days)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM equipment_items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Flag in-service items that have a pending task due at or before `now`.
    ///
    /// Returns the number of items flagged.
    pub async fn flag_overdue(pool: &SqlitePool, now: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE equipment_items SET status = $1, updated_at = CURRENT_TIMESTAMP
             WHERE status = $2
               AND EXISTS (
                   SELECT 1 FROM maintenance_tasks t
                   WHERE t.equipment_id = equipment_items.id
                     AND t.status = $3
                     AND t.due_at <= $4
               )",
        )
        .bind(STATUS_MAINTENANCE_DUE)
        .bind(STATUS_IN_SERVICE)
        .bind(TASK_PENDING)
        .bind(now)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
