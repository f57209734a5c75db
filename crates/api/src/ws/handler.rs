use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};

use crate::state::AppState;
use crate::ws::manager::WsManager;
use crate::ws::protocol::{parse_client_message, ClientMessage, ServerMessage};

/// GET /ws/generation-progress
///
/// Upgrades the connection and registers it with `WsManager`.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.ws_manager))
}

/// Manage a single WebSocket connection after upgrade.
///
/// A spawned sender task forwards the manager channel to the sink while
/// inbound frames are processed on the current task.
async fn handle_socket(socket: WebSocket, ws_manager: Arc<WsManager>) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "WebSocket connected");

    let mut rx = ws_manager.add(conn_id.clone()).await;

    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
            if closing {
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                handle_text(&ws_manager, &conn_id, text.as_str()).await;
            }
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    if let Some(conn) = ws_manager.remove(&conn_id).await {
        let secs = (chrono::Utc::now() - conn.connected_at).num_seconds();
        tracing::info!(conn_id = %conn_id, connected_secs = secs, "WebSocket disconnected");
    }
    send_task.abort();
}

/// Apply one subscribe/unsubscribe request and acknowledge it.
async fn handle_text(ws_manager: &WsManager, conn_id: &str, text: &str) {
    let reply = match parse_client_message(text) {
        Ok(ClientMessage::Subscribe { generation_id }) => {
            ws_manager.subscribe(conn_id, &generation_id).await;
            tracing::debug!(conn_id, generation_id = %generation_id, "Subscribed");
            ServerMessage::Subscribed { generation_id }
        }
        Ok(ClientMessage::Unsubscribe { generation_id }) => {
            ws_manager.unsubscribe(conn_id, &generation_id).await;
            tracing::debug!(conn_id, generation_id = %generation_id, "Unsubscribed");
            ServerMessage::Unsubscribed { generation_id }
        }
        Err(message) => {
            tracing::debug!(conn_id, error = %message, "Rejected WebSocket message");
            ServerMessage::Error { message }
        }
    };
    ws_manager.send_to(conn_id, reply.to_frame()).await;
}
