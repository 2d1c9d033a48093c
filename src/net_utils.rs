// Network send helpers

use std::net::SocketAddr;
use tokio::net::UdpSocket;

use crate::error::{AppError, Result};

/// Serialize a packet and send it as a single datagram.
pub async fn send_packet<T: serde::Serialize>(
    socket: &UdpSocket,
    addr: &SocketAddr,
    packet: &T,
) -> Result<()> {
    let encoded = serde_json::to_vec(packet)?;
    socket
        .send_to(&encoded, addr)
        .await
        .map_err(|e| AppError::Network(format!("failed to send to {}: {}", addr, e)))?;
    Ok(())
}
