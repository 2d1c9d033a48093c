// LSA origination, self-ingest and split-horizon flooding

use log::{error, info, warn};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;

use crate::types::{LsaPacket, Packet};
use crate::AppState;

/// Apply an advertisement to the local database and, when it advances the
/// topology, program kernel routes against the current confirmed-neighbor
/// snapshot. Returns whether the packet was accepted. The route commands
/// run after the database lock is released.
pub async fn ingest(state: &Arc<AppState>, packet: &LsaPacket) -> bool {
    let plan = {
        let mut lsdb = state.lsdb.lock().await;
        if !lsdb.update(packet) {
            return false;
        }
        let confirmed = state.neighbors.confirmed_snapshot().await;
        lsdb.route_plan(&confirmed)
    };
    crate::route::install_routes(&plan).await;
    true
}

fn build_lsa(state: &Arc<AppState>, sequence_number: i64, links: HashMap<String, u32>) -> LsaPacket {
    LsaPacket {
        router_id: state.router_id().to_string(),
        timestamp: crate::types::now_timestamp(),
        sequence_number,
        addresses: state
            .interfaces
            .iter()
            .map(|iface| iface.address.clone())
            .collect(),
        links,
    }
}

/// Periodic originated-advertisement loop. Spawned once, on the first
/// bidirectional neighbor confirmation; later confirmations only enlarge
/// the destination set read at each tick.
pub fn spawn_lsa_task(socket: Arc<UdpSocket>, state: Arc<AppState>) {
    tokio::spawn(async move {
        let mut sequence_number: i64 = 0;
        let mut interval = tokio::time::interval(Duration::from_secs(state.config.lsa_interval));
        loop {
            interval.tick().await;
            sequence_number += 1;

            let links = state.neighbors.detected_snapshot().await;
            let packet = build_lsa(&state, sequence_number, links);

            // The local entry must be at least as fresh as what peers see.
            ingest(&state, &packet).await;

            let targets = state.neighbors.confirmed_snapshot().await;
            let wire = Packet::Lsa(packet);
            for (neighbor_id, ip) in &targets {
                let addr = SocketAddr::new(IpAddr::V4(*ip), state.port());
                match crate::net_utils::send_packet(&socket, &addr, &wire).await {
                    Ok(()) => info!(
                        "[{}] [SEND] LSA seq {} to {} [{}]",
                        state.router_id(),
                        sequence_number,
                        addr,
                        neighbor_id
                    ),
                    Err(e) => error!(
                        "[{}] failed to send LSA to {} [{}]: {}",
                        state.router_id(),
                        addr,
                        neighbor_id,
                        e
                    ),
                }
            }
        }
    });
}

/// Flood targets for a received advertisement: every confirmed neighbor
/// except the one it arrived from. The sequence gate, not this filter, is
/// what terminates flooding fabric-wide.
pub fn flood_targets(
    confirmed: &HashMap<String, Ipv4Addr>,
    sender_ip: Ipv4Addr,
) -> Vec<(String, Ipv4Addr)> {
    confirmed
        .iter()
        .filter(|(_, ip)| **ip != sender_ip)
        .map(|(id, ip)| (id.clone(), *ip))
        .collect()
}

/// Forward a received advertisement byte-identically (the raw datagram,
/// never a re-encode) to all confirmed neighbors except the sender.
pub async fn forward_except(
    socket: &UdpSocket,
    state: &Arc<AppState>,
    raw: &[u8],
    sender_ip: Ipv4Addr,
) {
    let confirmed = state.neighbors.confirmed_snapshot().await;
    for (neighbor_id, ip) in flood_targets(&confirmed, sender_ip) {
        let addr = SocketAddr::new(IpAddr::V4(ip), state.port());
        match socket.send_to(raw, addr).await {
            Ok(_) => info!(
                "[{}] [FORWARD] LSA to {} [{}]",
                state.router_id(),
                addr,
                neighbor_id
            ),
            Err(e) => warn!(
                "[{}] failed to forward LSA to {} [{}]: {}",
                state.router_id(),
                addr,
                neighbor_id,
                e
            ),
        }
    }
}
