use std::sync::Arc;
use std::time::Duration;

use crate::ws::manager::WsManager;

/// Proxies tend to drop idle sockets after a minute.
const PING_EVERY: Duration = Duration::from_secs(30);

/// Ping every progress subscriber on a fixed cadence until aborted.
pub fn start_heartbeat(ws_manager: Arc<WsManager>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PING_EVERY);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let connections = ws_manager.connection_count().await;
            if connections > 0 {
                tracing::trace!(connections, "Pinging progress sockets");
                ws_manager.ping_all().await;
            }
        }
    })
}
