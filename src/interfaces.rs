// Local interface inventory

use pnet::datalink;
use pnet::ipnetwork::{IpNetwork, Ipv4Network};
use std::net::Ipv4Addr;

/// Interfaces whose OS name starts with this prefix carry fabric traffic.
pub const NIC_PREFIX: &str = "eth";

/// Addresses starting with this prefix face the router's own host subnet.
pub const HOST_SUBNET_PREFIX: &str = "192.";

/// One advertisable address. Host-subnet interfaces carry the subnet in
/// `network/24` form and no broadcast; inter-router interfaces carry the
/// plain address and the directed broadcast used for HELLOs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    pub address: String,
    pub broadcast: Option<Ipv4Addr>,
}

impl Interface {
    pub fn is_inter_router(&self) -> bool {
        self.broadcast.is_some()
    }
}

/// Classify one IPv4 address. Host-subnet addresses are normalized to
/// their /24 network address so peers install a subnet route instead of
/// a host route.
pub fn classify(network: Ipv4Network, host_prefix: &str) -> Interface {
    let ip = network.ip();
    if ip.to_string().starts_with(host_prefix) {
        let subnet = Ipv4Addr::from(u32::from(ip) & 0xffff_ff00);
        Interface {
            address: format!("{}/24", subnet),
            broadcast: None,
        }
    } else {
        Interface {
            address: ip.to_string(),
            broadcast: Some(network.broadcast()),
        }
    }
}

/// Enumerate the advertisable addresses of every `eth*` interface. Taken
/// once at startup; link costs and addressing do not change mid-run.
pub fn list_interfaces() -> Vec<Interface> {
    let mut found = Vec::new();
    for iface in datalink::interfaces() {
        if !iface.name.starts_with(NIC_PREFIX) {
            continue;
        }
        for ip_network in iface.ips {
            if let IpNetwork::V4(v4_network) = ip_network {
                let ip = v4_network.ip();
                if ip.is_loopback() || ip.is_unspecified() {
                    continue;
                }
                found.push(classify(v4_network, HOST_SUBNET_PREFIX));
            }
        }
    }
    found
}
