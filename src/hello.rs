// HELLO packet construction and transmission

use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;

use crate::error::Result;
use crate::types::{HelloPacket, Packet};
use crate::AppState;

/// Send one HELLO on an inter-router interface. The neighbor list is a
/// snapshot taken at transmit time so peers can confirm bidirectionality
/// against our current view.
pub async fn send_hello(
    socket: &UdpSocket,
    addr: &SocketAddr,
    state: &Arc<AppState>,
    ip_address: &str,
) -> Result<()> {
    let known_neighbors = state.neighbors.detected_ids().await;
    let packet = Packet::Hello(HelloPacket {
        router_id: state.router_id().to_string(),
        timestamp: crate::types::now_timestamp(),
        ip_address: ip_address.to_string(),
        known_neighbors,
    });

    crate::net_utils::send_packet(socket, addr, &packet).await?;
    info!("[{}] [SEND] HELLO to {}", state.router_id(), addr);
    Ok(())
}
