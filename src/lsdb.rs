// Link-state database: freshness gate, Dijkstra, next-hop derivation

use log::{debug, info};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap, HashMap, HashSet};
use std::net::Ipv4Addr;

use crate::types::LsaPacket;

/// The most recent accepted advertisement from one originator.
#[derive(Debug, Clone, PartialEq)]
pub struct LsdbEntry {
    pub sequence_number: i64,
    pub timestamp: f64,
    pub addresses: Vec<String>,
    pub links: HashMap<String, u32>,
}

impl LsdbEntry {
    /// Entry for a router heard of by name only: no addresses, no edges.
    fn placeholder() -> Self {
        Self {
            sequence_number: -1,
            timestamp: 0.0,
            addresses: Vec::new(),
            links: HashMap::new(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.sequence_number < 0
    }
}

/// One kernel route to program: destination (IPv4 literal or network/24)
/// and the confirmed gateway address to reach it through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRoute {
    pub destination: String,
    pub gateway: Ipv4Addr,
}

pub struct Lsdb {
    router_id: String,
    table: HashMap<String, LsdbEntry>,
    routing: BTreeMap<String, String>,
}

impl Lsdb {
    pub fn new(router_id: String) -> Self {
        Self {
            router_id,
            table: HashMap::new(),
            routing: BTreeMap::new(),
        }
    }

    pub fn entry(&self, router_id: &str) -> Option<&LsdbEntry> {
        self.table.get(router_id)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Destination router id -> first-hop neighbor id on the shortest path.
    pub fn routing_table(&self) -> &BTreeMap<String, String> {
        &self.routing
    }

    /// Apply a received (or self-originated) advertisement. The sequence
    /// gate is the single check that deduplicates flooded copies and
    /// rejects out-of-order replays: an entry is replaced only by a
    /// strictly greater sequence number.
    pub fn update(&mut self, packet: &LsaPacket) -> bool {
        if let Some(entry) = self.table.get(&packet.router_id) {
            if packet.sequence_number <= entry.sequence_number {
                return false;
            }
        }

        self.table.insert(
            packet.router_id.clone(),
            LsdbEntry {
                sequence_number: packet.sequence_number,
                timestamp: packet.timestamp,
                addresses: packet.addresses.clone(),
                links: packet.links.clone(),
            },
        );

        // Routers named only in someone's links participate as graph nodes
        // without outbound edges until their own advertisement arrives.
        for neighbor_id in packet.links.keys() {
            if !self.table.contains_key(neighbor_id) {
                info!("[{}] discovered router {} by name", self.router_id, neighbor_id);
                self.table
                    .insert(neighbor_id.clone(), LsdbEntry::placeholder());
            }
        }

        let (_, predecessors) = self.dijkstra();
        self.rebuild_routing(&predecessors);
        true
    }

    /// Shortest paths from the local router over the declared links.
    /// Returns accumulated distances and the predecessor of every reached
    /// node; unreached nodes keep `u64::MAX` and no predecessor. Ties
    /// break on router id so repeated runs produce identical results.
    pub fn dijkstra(&self) -> (HashMap<String, u64>, HashMap<String, Option<String>>) {
        let mut distances: HashMap<String, u64> = HashMap::new();
        let mut predecessors: HashMap<String, Option<String>> = HashMap::new();
        for router_id in self.table.keys() {
            distances.insert(router_id.clone(), u64::MAX);
            predecessors.insert(router_id.clone(), None);
        }
        distances.insert(self.router_id.clone(), 0);
        predecessors.entry(self.router_id.clone()).or_insert(None);

        let mut visited: HashSet<String> = HashSet::new();
        let mut heap = BinaryHeap::new();
        heap.push(Candidate {
            distance: 0,
            router_id: self.router_id.clone(),
        });

        while let Some(Candidate { distance, router_id }) = heap.pop() {
            if !visited.insert(router_id.clone()) {
                continue;
            }
            let links = match self.table.get(&router_id) {
                Some(entry) => &entry.links,
                // The local router before self-ingest: a node with no edges.
                None => continue,
            };
            for (neighbor_id, cost) in links {
                if visited.contains(neighbor_id) {
                    continue;
                }
                let total = distance + u64::from(*cost);
                let best = distances.get(neighbor_id).copied().unwrap_or(u64::MAX);
                if total < best {
                    distances.insert(neighbor_id.clone(), total);
                    predecessors.insert(neighbor_id.clone(), Some(router_id.clone()));
                    heap.push(Candidate {
                        distance: total,
                        router_id: neighbor_id.clone(),
                    });
                }
            }
        }

        (distances, predecessors)
    }

    /// Rebuild the destination -> first-hop map from scratch by walking
    /// predecessor chains back toward the local router. A chain that ends
    /// before reaching it means the destination is unreachable this round
    /// and gets no entry.
    fn rebuild_routing(&mut self, predecessors: &HashMap<String, Option<String>>) {
        self.routing.clear();
        for destination in predecessors.keys() {
            if destination == &self.router_id {
                continue;
            }
            let mut hop = destination.clone();
            let first_hop = loop {
                match predecessors.get(&hop).and_then(|p| p.clone()) {
                    None => break None,
                    Some(p) if p == self.router_id => break Some(hop),
                    Some(p) => hop = p,
                }
            };
            match first_hop {
                Some(gateway) => {
                    self.routing.insert(destination.clone(), gateway);
                }
                None => {
                    debug!(
                        "[{}] {} unreachable, no route this round",
                        self.router_id, destination
                    );
                }
            }
        }
    }

    /// Pair every advertised address of each routed destination with its
    /// gateway's confirmed IP. A destination whose first hop has not been
    /// bidirectionally confirmed yet is deliberately left out.
    pub fn route_plan(&self, confirmed: &HashMap<String, Ipv4Addr>) -> Vec<PlannedRoute> {
        let mut plan = Vec::new();
        for (destination, gateway_id) in &self.routing {
            let gateway = match confirmed.get(gateway_id) {
                Some(ip) => *ip,
                None => {
                    info!(
                        "[{}] skipping route to {} via {}: gateway not confirmed yet",
                        self.router_id, destination, gateway_id
                    );
                    continue;
                }
            };
            if let Some(entry) = self.table.get(destination) {
                for address in &entry.addresses {
                    plan.push(PlannedRoute {
                        destination: address.clone(),
                        gateway,
                    });
                }
            }
        }
        plan
    }
}

#[derive(Debug, Eq, PartialEq)]
struct Candidate {
    distance: u64,
    router_id: String,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap pops the nearest candidate first.
        other
            .distance
            .cmp(&self.distance)
            .then_with(|| other.router_id.cmp(&self.router_id))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
