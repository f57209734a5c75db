//! Verified payment-provider webhook events.

use fathom_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `payment_events` table. `(provider, external_id)` is unique.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PaymentEvent {
    pub id: DbId,
    pub provider: String,
    pub external_id: String,
    pub event_type: String,
    pub payload: Json<serde_json::Value>,
    pub received_at: Timestamp,
}
