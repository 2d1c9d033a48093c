// UDP receive loop: decode, filter self-echo, dispatch by packet type

use log::{debug, error, info, warn};
use std::net::IpAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;

use crate::error::{AppError, Result};
use crate::types::Packet;
use crate::AppState;

/// Receive and dispatch datagrams until the process dies. Decode failures
/// and processing errors are per-packet; only a configuration error (a
/// detected neighbor with no cost entry) escapes the loop, so the
/// supervisor can fail fast.
pub async fn main_loop(socket: Arc<UdpSocket>, state: Arc<AppState>) -> Result<()> {
    let mut buf = [0u8; crate::RECV_BUFFER_SIZE];
    loop {
        let (len, src_addr) = match socket.recv_from(&mut buf).await {
            Ok(received) => received,
            Err(e) => {
                warn!("[{}] receive failed: {}", state.router_id(), e);
                continue;
            }
        };
        let sender_ip = match src_addr.ip() {
            IpAddr::V4(ip) => ip,
            IpAddr::V6(_) => continue,
        };

        let packet = match serde_json::from_slice::<Packet>(&buf[..len]) {
            Ok(packet) => packet,
            Err(e) => {
                debug!("dropping undecodable datagram from {}: {}", src_addr, e);
                continue;
            }
        };

        // Broadcast HELLOs loop back to their own sender.
        if packet.router_id() == state.router_id() {
            continue;
        }

        match packet {
            Packet::Hello(hello) => {
                info!(
                    "[{}] [RECV] HELLO from {} [{}]",
                    state.router_id(),
                    sender_ip,
                    hello.router_id
                );
                match crate::neighbor::process_hello(&state, &hello, sender_ip).await {
                    Ok(true) => {
                        crate::lsa::spawn_lsa_task(Arc::clone(&socket), Arc::clone(&state))
                    }
                    Ok(false) => {}
                    Err(e @ AppError::Config(_)) => {
                        error!("[{}] {}", state.router_id(), e);
                        return Err(e);
                    }
                    Err(e) => warn!("[{}] failed to process HELLO: {}", state.router_id(), e),
                }
            }
            Packet::Lsa(lsa) => {
                info!(
                    "[{}] [RECV] LSA from {} [{}] seq {}",
                    state.router_id(),
                    sender_ip,
                    lsa.router_id,
                    lsa.sequence_number
                );
                if crate::neighbor::process_lsa(&state, &lsa).await {
                    crate::lsa::forward_except(&socket, &state, &buf[..len], sender_ip).await;
                } else {
                    debug!(
                        "[{}] stale LSA from {} (seq {}), not forwarded",
                        state.router_id(),
                        lsa.router_id,
                        lsa.sequence_number
                    );
                }
            }
        }
    }
}
