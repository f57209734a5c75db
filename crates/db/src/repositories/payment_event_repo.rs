//! Repository for the `payment_events` table.

use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::models::payment_event::PaymentEvent;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, provider, external_id, event_type, payload, received_at";

/// Idempotent store of verified webhook deliveries.
pub struct PaymentEventRepo;

impl PaymentEventRepo {
    /// Record an event unless `(provider, external_id)` was seen before.
    ///
    /// Returns `None` for a duplicate delivery.
    pub async fn record(
        pool: &SqlitePool,
        provider: &str,
        external_id: &str,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<Option<PaymentEvent>, sqlx::Error> {
        let query = format!(
            "INSERT INTO payment_events (provider, external_id, event_type, payload)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (provider, external_id) DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PaymentEvent>(&query)
            .bind(provider)
            .bind(external_id)
            .bind(event_type)
            .bind(Json(payload))
            .fetch_optional(pool)
            .await
    }

    pub async fn list_recent(pool: &SqlitePool, limit: i64) -> Result<Vec<PaymentEvent>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payment_events ORDER BY id DESC LIMIT $1");
        sqlx::query_as::<_, PaymentEvent>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
