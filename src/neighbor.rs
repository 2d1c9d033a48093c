// Neighbor tracking and inbound packet processing

use log::info;
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config;
use crate::error::Result;
use crate::types::{HelloPacket, LsaPacket};
use crate::AppState;

/// Shared neighbor state. Components hold the table and read through
/// snapshot accessors; the maps themselves never leak. Both maps only grow
/// during a run.
#[derive(Debug, Default)]
pub struct NeighborTable {
    /// Neighbor id -> link cost, populated from received HELLOs.
    detected: Mutex<HashMap<String, u32>>,
    /// Neighbor id -> HELLO source address, populated once the adjacency
    /// is known to be bidirectional. Gates all LSA transmission.
    confirmed: Mutex<HashMap<String, Ipv4Addr>>,
}

impl NeighborTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_detected(&self, neighbor_id: &str, cost: u32) {
        let mut detected = self.detected.lock().await;
        if detected.insert(neighbor_id.to_string(), cost).is_none() {
            info!("neighbor detected: {} (cost {})", neighbor_id, cost);
        }
    }

    /// Record a bidirectional adjacency. Returns false when the neighbor
    /// was already confirmed.
    pub async fn confirm(&self, neighbor_id: &str, ip: Ipv4Addr) -> bool {
        let mut confirmed = self.confirmed.lock().await;
        if confirmed.contains_key(neighbor_id) {
            return false;
        }
        confirmed.insert(neighbor_id.to_string(), ip);
        info!("neighbor confirmed: {} at {}", neighbor_id, ip);
        true
    }

    pub async fn detected_ids(&self) -> Vec<String> {
        self.detected.lock().await.keys().cloned().collect()
    }

    pub async fn detected_snapshot(&self) -> HashMap<String, u32> {
        self.detected.lock().await.clone()
    }

    pub async fn confirmed_snapshot(&self) -> HashMap<String, Ipv4Addr> {
        self.confirmed.lock().await.clone()
    }

    pub async fn is_confirmed(&self, neighbor_id: &str) -> bool {
        self.confirmed.lock().await.contains_key(neighbor_id)
    }
}

/// Handle a received HELLO: record the sender as detected (its link cost
/// comes from configuration and must exist), and confirm it when it lists
/// this router among its own known neighbors. Returns true when the LSA
/// emitter should be started, which happens at most once per run.
pub async fn process_hello(
    state: &Arc<AppState>,
    packet: &HelloPacket,
    sender_ip: Ipv4Addr,
) -> Result<bool> {
    let cost = config::link_cost(state.router_id(), &packet.router_id)?;
    state.neighbors.insert_detected(&packet.router_id, cost).await;

    let recognizes_us = packet
        .known_neighbors
        .iter()
        .any(|id| id == state.router_id());
    if !recognizes_us {
        return Ok(false);
    }
    if !state.neighbors.confirm(&packet.router_id, sender_ip).await {
        return Ok(false);
    }
    Ok(state.try_start_lsa())
}

/// Handle a received LSA. Returns true when the packet advanced the LSDB
/// and must therefore be flooded onward.
pub async fn process_lsa(state: &Arc<AppState>, packet: &LsaPacket) -> bool {
    crate::lsa::ingest(state, packet).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn test_state(router_id: &str) -> Arc<AppState> {
        let config = Config {
            router_id: router_id.to_string(),
            port: crate::DEFAULT_PORT,
            hello_interval: crate::DEFAULT_HELLO_INTERVAL_SEC,
            lsa_interval: crate::DEFAULT_LSA_INTERVAL_SEC,
        };
        Arc::new(AppState::new(config, Vec::new()))
    }

    fn hello(router_id: &str, known_neighbors: &[&str]) -> HelloPacket {
        HelloPacket {
            router_id: router_id.to_string(),
            timestamp: 1.0,
            ip_address: "10.0.1.2".to_string(),
            known_neighbors: known_neighbors.iter().map(|id| id.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn hello_without_reciprocity_only_detects() {
        std::env::set_var("COST_na_nb_net", "3");
        let state = test_state("na");
        let sender: Ipv4Addr = "10.0.1.2".parse().unwrap();

        let start = process_hello(&state, &hello("nb", &[]), sender).await.unwrap();
        assert!(!start);
        assert_eq!(state.neighbors.detected_snapshot().await.get("nb"), Some(&3));
        assert!(state.neighbors.confirmed_snapshot().await.is_empty());
        assert!(!state.lsa_started());
    }

    #[tokio::test]
    async fn first_confirmation_starts_the_emitter_exactly_once() {
        std::env::set_var("COST_nc_nd_net", "1");
        std::env::set_var("COST_nc_ne_net", "2");
        let state = test_state("nc");
        let sender: Ipv4Addr = "10.0.1.2".parse().unwrap();

        // First bidirectional HELLO: start requested.
        let start = process_hello(&state, &hello("nd", &["nc"]), sender).await.unwrap();
        assert!(start);
        assert!(state.lsa_started());
        assert_eq!(
            state.neighbors.confirmed_snapshot().await.get("nd"),
            Some(&sender)
        );

        // Same neighbor again: no restart.
        let start = process_hello(&state, &hello("nd", &["nc"]), sender).await.unwrap();
        assert!(!start);

        // A second neighbor enlarges the confirmed set without restarting.
        let other: Ipv4Addr = "10.0.2.2".parse().unwrap();
        let start = process_hello(&state, &hello("ne", &["nc"]), other).await.unwrap();
        assert!(!start);
        assert!(state.neighbors.is_confirmed("ne").await);
    }

    #[tokio::test]
    async fn confirmed_is_a_subset_of_detected() {
        std::env::set_var("COST_nf_ng_net", "1");
        std::env::set_var("COST_nf_nh_net", "1");
        let state = test_state("nf");

        process_hello(&state, &hello("ng", &["nf"]), "10.0.1.2".parse().unwrap())
            .await
            .unwrap();
        process_hello(&state, &hello("nh", &[]), "10.0.2.2".parse().unwrap())
            .await
            .unwrap();

        let detected = state.neighbors.detected_snapshot().await;
        let confirmed = state.neighbors.confirmed_snapshot().await;
        assert!(confirmed.keys().all(|id| detected.contains_key(id)));
        assert!(detected.contains_key("nh") && !confirmed.contains_key("nh"));
    }

    #[tokio::test]
    async fn missing_link_cost_is_fatal() {
        let state = test_state("ni");
        let result = process_hello(&state, &hello("nj", &[]), "10.0.1.2".parse().unwrap()).await;
        assert!(matches!(result, Err(crate::AppError::Config(_))));
        assert!(state.neighbors.detected_snapshot().await.is_empty());
    }
}
