//! WebSocket generation-progress notifier.
//!
//! Provides connection and subscription management, the JSON message
//! protocol, heartbeat monitoring, and the HTTP upgrade handler.

mod handler;
mod heartbeat;
pub mod manager;
pub mod protocol;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
