// Long-running timer tasks

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;

use crate::AppState;

/// Periodic HELLO broadcast over every inter-router interface. Send
/// failures are logged and retried implicitly at the next tick.
pub fn spawn_hello_task(socket: Arc<UdpSocket>, state: Arc<AppState>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(state.config.hello_interval));
        loop {
            interval.tick().await;
            for iface in &state.interfaces {
                if let Some(broadcast) = iface.broadcast {
                    let addr = SocketAddr::new(IpAddr::V4(broadcast), state.port());
                    if let Err(e) =
                        crate::hello::send_hello(&socket, &addr, &state, &iface.address).await
                    {
                        log::error!(
                            "[{}] failed to send HELLO to {}: {}",
                            state.router_id(),
                            addr,
                            e
                        );
                    }
                }
            }
        }
    });
}
