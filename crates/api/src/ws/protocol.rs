//! JSON messages exchanged on `/ws/generation-progress`.
//!
//! ```text
//! client -> server   {"type":"subscribe","generationId":"..."}
//!                    {"type":"unsubscribe","generationId":"..."}
//! server -> client   {"type":"subscribed","generationId":"..."}
//!                    {"type":"unsubscribed","generationId":"..."}
//!                    {"type":"generation-progress","generationId":"...","status":"...",...}
//!                    {"type":"error","message":"..."}
//! ```

use axum::extract::ws::Message;
use fathom_core::generation::GenerationProgress;
use serde::{Deserialize, Serialize};

/// Inbound message from a browser client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    Subscribe {
        #[serde(rename = "generationId")]
        generation_id: String,
    },
    Unsubscribe {
        #[serde(rename = "generationId")]
        generation_id: String,
    },
}

/// Outbound message pushed to a browser client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "subscribed")]
    Subscribed {
        #[serde(rename = "generationId")]
        generation_id: String,
    },
    #[serde(rename = "unsubscribed")]
    Unsubscribed {
        #[serde(rename = "generationId")]
        generation_id: String,
    },
    #[serde(rename = "generation-progress")]
    GenerationProgress(GenerationProgress),
    #[serde(rename = "error")]
    Error { message: String },
}

impl ServerMessage {
    /// Encode as a WebSocket text frame.
    pub fn to_frame(&self) -> Message {
        // Every variant is a plain struct of strings and numbers.
        let text = serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to encode WebSocket message");
            r#"{"type":"error","message":"encoding failure"}"#.to_string()
        });
        Message::Text(text.into())
    }
}

/// Parse an inbound text frame.
pub fn parse_client_message(text: &str) -> Result<ClientMessage, String> {
    serde_json::from_str(text).map_err(|e| format!("Invalid message: {e}"))
}
