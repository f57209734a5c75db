//! Repository for the `maintenance_tasks` table.

use fathom_core::equipment::{
    next_maintenance_due, status_after_maintenance, TASK_COMPLETED, TASK_PENDING, TASK_SKIPPED,
};
use fathom_core::types::{DbId, Timestamp};
use sqlx::SqlitePool;

use crate::models::equipment::{
    CreateMaintenanceTask, EquipmentItem, MaintenanceCompletion, MaintenanceTask,
};
use crate::repositories::equipment_repo::COLUMNS as ITEM_COLUMNS;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, equipment_id, title, description, due_at, status, completed_at, \
                       notes, created_at, updated_at";

/// Provides operations on scheduled equipment maintenance.
pub struct MaintenanceTaskRepo;

impl MaintenanceTaskRepo {
    /// Schedule a new pending task for an item.
    pub async fn create(
        pool: &SqlitePool,
        equipment_id: DbId,
        input: &CreateMaintenanceTask,
    ) -> Result<MaintenanceTask, sqlx::Error> {
        let query = format!(
            "INSERT INTO maintenance_tasks (equipment_id, title, description, due_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MaintenanceTask>(&query)
            .bind(equipment_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.due_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<MaintenanceTask>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM maintenance_tasks WHERE id = $1");
        sqlx::query_as::<_, MaintenanceTask>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All tasks of one item, soonest due first.
    pub async fn list_by_equipment(
        pool: &SqlitePool,
        equipment_id: DbId,
    ) -> Result<Vec<MaintenanceTask>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM maintenance_tasks WHERE equipment_id = $1 ORDER BY due_at, id"
        );
        sqlx::query_as::<_, MaintenanceTask>(&query)
            .bind(equipment_id)
            .fetch_all(pool)
            .await
    }

    /// Pending tasks due at or before `until`, overdue ones included.
    pub async fn list_due(
        pool: &SqlitePool,
        until: Timestamp,
    ) -> Result<Vec<MaintenanceTask>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM maintenance_tasks
             WHERE status = $1 AND due_at <= $2
             ORDER BY due_at, id"
        );
        sqlx::query_as::<_, MaintenanceTask>(&query)
            .bind(TASK_PENDING)
            .bind(until)
            .fetch_all(pool)
            .await
    }

    /// Complete a pending task in one transaction.
    ///
    /// Marks the task completed, stamps the item's `last_maintained_at`,
    /// returns a `maintenance_due` item to service, and schedules the next
    /// task when the item has a maintenance interval.
    ///
    /// Returns `None` if the task does not exist or is no longer pending.
    pub async fn complete(
        pool: &SqlitePool,
        id: DbId,
        notes: Option<&str>,
        now: Timestamp,
    ) -> Result<Option<MaintenanceCompletion>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE maintenance_tasks SET
                status = $2,
                completed_at = $3,
                notes = COALESCE($4, notes),
                updated_at = CURRENT_TIMESTAMP
             WHERE id = $1 AND status = $5
             RETURNING {COLUMNS}"
        );
        let Some(task) = sqlx::query_as::<_, MaintenanceTask>(&query)
            .bind(id)
            .bind(TASK_COMPLETED)
            .bind(now)
            .bind(notes)
            .bind(TASK_PENDING)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let query = format!("SELECT {ITEM_COLUMNS} FROM equipment_items WHERE id = $1");
        let current = sqlx::query_as::<_, EquipmentItem>(&query)
            .bind(task.equipment_id)
            .fetch_one(&mut *tx)
            .await?;

        let query = format!(
            "UPDATE equipment_items SET
                status = $2,
                last_maintained_at = $3,
                updated_at = CURRENT_TIMESTAMP
             WHERE id = $1
             RETURNING {ITEM_COLUMNS}"
        );
        let item = sqlx::query_as::<_, EquipmentItem>(&query)
            .bind(current.id)
            .bind(status_after_maintenance(&current.status))
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        let next_task = match next_maintenance_due(now, item.maintenance_interval_days) {
            Some(due_at) => {
                let query = format!(
                    "INSERT INTO maintenance_tasks (equipment_id, title, description, due_at)
                     VALUES ($1, $2, $3, $4)
                     RETURNING {COLUMNS}"
                );
                let next = sqlx::query_as::<_, MaintenanceTask>(&query)
                    .bind(item.id)
                    .bind(&task.title)
                    .bind(&task.description)
                    .bind(due_at)
                    .fetch_one(&mut *tx)
                    .await?;
                tracing::debug!(
                    equipment_id = item.id,
                    task_id = next.id,
                    due_at = %next.due_at,
                    "Scheduled follow-up maintenance",
                );
                Some(next)
            }
            None => None,
        };

        tx.commit().await?;
        Ok(Some(MaintenanceCompletion {
            task,
            item,
            next_task,
        }))
    }

    /// Mark a pending task skipped. Returns `None` if it is not pending.
    pub async fn skip(
        pool: &SqlitePool,
        id: DbId,
        notes: Option<&str>,
    ) -> Result<Option<MaintenanceTask>, sqlx::Error> {
        let query = format!(
            "UPDATE maintenance_tasks SET
                status = $2,
                notes = COALESCE($3, notes),
                updated_at = CURRENT_TIMESTAMP
             WHERE id = $1 AND status = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MaintenanceTask>(&query)
            .bind(id)
            .bind(TASK_SKIPPED)
            .bind(notes)
            .bind(TASK_PENDING)
            .fetch_optional(pool)
            .await
    }
}
