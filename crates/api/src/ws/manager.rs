use std::collections::{HashMap, HashSet, VecDeque};

use axum::body::Bytes;
use axum::extract::ws::Message;
use fathom_core::generation::GenerationProgress;
use fathom_core::types::Timestamp;
use tokio::sync::{mpsc, RwLock};

use crate::ws::protocol::ServerMessage;

/// Opt-outs remembered per connection; the oldest is forgotten first.
pub const MAX_OPT_OUTS: usize = 256;

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// Metadata for a single WebSocket connection.
pub struct WsConnection {
    /// Channel sender for outbound messages to this connection.
    pub sender: WsSender,
    /// When this connection was established.
    pub connected_at: Timestamp,
    /// Generation ids this connection explicitly unsubscribed from. Excluded
    /// from the fallback broadcast for those ids. Bounded by [`MAX_OPT_OUTS`].
    opted_out: VecDeque<String>,
}

impl WsConnection {
    fn has_opted_out(&self, generation_id: &str) -> bool {
        self.opted_out.iter().any(|id| id == generation_id)
    }

    fn opt_in(&mut self, generation_id: &str) {
        self.opted_out.retain(|id| id != generation_id);
    }

    fn opt_out(&mut self, generation_id: &str) {
        if self.has_opted_out(generation_id) {
            return;
        }
        if self.opted_out.len() == MAX_OPT_OUTS {
            self.opted_out.pop_front();
        }
        self.opted_out.push_back(generation_id.to_string());
    }
}

/// Manages active WebSocket connections and their generation subscriptions.
///
/// Lock order is `subscriptions` before `connections` wherever both are held.
pub struct WsManager {
    connections: RwLock<HashMap<String, WsConnection>>,
    /// generation id -> subscribed connection ids.
    subscriptions: RwLock<HashMap<String, HashSet<String>>>,
}

impl WsManager {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            subscriptions: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection.
    ///
    /// Returns the receiver half of the message channel so the caller can
    /// forward messages to the WebSocket sink.
    pub async fn add(&self, conn_id: String) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = WsConnection {
            sender: tx,
            connected_at: chrono::Utc::now(),
            opted_out: VecDeque::new(),
        };
        self.connections.write().await.insert(conn_id, conn);
        rx
    }

    /// Remove a connection and drop it from every subscriber set.
    ///
    /// Returns the removed connection's metadata, if it was registered.
    pub async fn remove(&self, conn_id: &str) -> Option<WsConnection> {
        let mut subs = self.subscriptions.write().await;
        subs.retain(|_, members| {
            members.remove(conn_id);
            !members.is_empty()
        });
        self.connections.write().await.remove(conn_id)
    }

    /// Subscribe a connection to progress events for `generation_id`.
    ///
    /// Returns `false` if the connection is not registered.
    pub async fn subscribe(&self, conn_id: &str, generation_id: &str) -> bool {
        let mut subs = self.subscriptions.write().await;
        let mut conns = self.connections.write().await;
        let Some(conn) = conns.get_mut(conn_id) else {
            return false;
        };
        conn.opt_in(generation_id);
        subs.entry(generation_id.to_string())
            .or_default()
            .insert(conn_id.to_string());
        true
    }

    /// Unsubscribe a connection from `generation_id`.
    ///
    /// The connection also stops receiving the fallback broadcast for that
    /// id. Returns `false` if the connection is not registered.
    pub async fn unsubscribe(&self, conn_id: &str, generation_id: &str) -> bool {
        let mut subs = self.subscriptions.write().await;
        let mut conns = self.connections.write().await;
        let Some(conn) = conns.get_mut(conn_id) else {
            return false;
        };
        conn.opt_out(generation_id);
        if let Some(members) = subs.get_mut(generation_id) {
            members.remove(conn_id);
            if members.is_empty() {
                subs.remove(generation_id);
            }
        }
        true
    }

    /// Number of connections subscribed to `generation_id`.
    pub async fn subscriber_count(&self, generation_id: &str) -> usize {
        self.subscriptions
            .read()
            .await
            .get(generation_id)
            .map_or(0, HashSet::len)
    }

    /// Deliver a progress event.
    ///
    /// Sends to the id's subscribers if it has any; otherwise to every
    /// connection that has not unsubscribed from the id. Bookkeeping for the
    /// id is dropped once the event is terminal. Returns the number of
    /// connections the event was queued for.
    pub async fn publish(&self, progress: &GenerationProgress) -> usize {
        let frame = ServerMessage::GenerationProgress(progress.clone()).to_frame();
        let id = progress.generation_id.as_str();
        let terminal = progress.status.is_terminal();

        let mut subs = self.subscriptions.write().await;
        let mut conns = self.connections.write().await;

        let mut delivered = 0;
        match subs.get(id) {
            Some(members) => {
                for conn_id in members {
                    if let Some(conn) = conns.get(conn_id) {
                        if conn.sender.send(frame.clone()).is_ok() {
                            delivered += 1;
                        }
                    }
                }
            }
            None => {
                for conn in conns.values().filter(|c| !c.has_opted_out(id)) {
                    if conn.sender.send(frame.clone()).is_ok() {
                        delivered += 1;
                    }
                }
            }
        }

        if terminal {
            subs.remove(id);
            for conn in conns.values_mut() {
                conn.opt_in(id);
            }
        }

        tracing::debug!(
            generation_id = %id,
            status = progress.status.as_str(),
            delivered,
            "Published generation progress",
        );
        delivered
    }

    /// Queue a message for one connection. Returns `false` if it is gone.
    pub async fn send_to(&self, conn_id: &str, message: Message) -> bool {
        self.connections
            .read()
            .await
            .get(conn_id)
            .is_some_and(|conn| conn.sender.send(message).is_ok())
    }

    /// Return the current number of active connections.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send a Close frame to every connection, then clear all state.
    ///
    /// Used during graceful shutdown.
    pub async fn shutdown_all(&self) {
        let mut subs = self.subscriptions.write().await;
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        subs.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }

    /// Send a Ping frame to every connected client.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Ping(Bytes::new()));
        }
    }
}

impl Default for WsManager {
    fn default() -> Self {
        Self::new()
    }
}
