// Wire packet definitions shared by every router on the fabric

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Periodic broadcast announcing this router and the neighbors it has
/// detected so far. Peers use `known_neighbors` to confirm that the
/// adjacency is bidirectional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelloPacket {
    pub router_id: String,
    pub timestamp: f64,
    pub ip_address: String,
    pub known_neighbors: Vec<String>,
}

/// One router's view of itself: its interface addresses (host subnets in
/// `network/24` form) and the cost of each confirmed adjacency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LsaPacket {
    pub router_id: String,
    pub timestamp: f64,
    pub sequence_number: i64,
    pub addresses: Vec<String>,
    pub links: HashMap<String, u32>,
}

/// Every datagram is one packet, tagged by its `type` field. Unknown tags
/// fail to decode and the datagram is dropped by the receiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Packet {
    #[serde(rename = "HELLO")]
    Hello(HelloPacket),
    #[serde(rename = "LSA")]
    Lsa(LsaPacket),
}

impl Packet {
    pub fn router_id(&self) -> &str {
        match self {
            Packet::Hello(hello) => &hello.router_id,
            Packet::Lsa(lsa) => &lsa.router_id,
        }
    }
}

/// Seconds since the Unix epoch, as carried in the wire `timestamp` field.
pub fn now_timestamp() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_hello() -> Packet {
        Packet::Hello(HelloPacket {
            router_id: "r1".to_string(),
            timestamp: 1700000000.25,
            ip_address: "10.0.1.1".to_string(),
            known_neighbors: vec!["r2".to_string(), "r3".to_string()],
        })
    }

    fn sample_lsa() -> Packet {
        Packet::Lsa(LsaPacket {
            router_id: "r2".to_string(),
            timestamp: 1700000010.5,
            sequence_number: 4,
            addresses: vec!["10.0.1.2".to_string(), "192.168.2.0/24".to_string()],
            links: HashMap::from([("r1".to_string(), 1), ("r3".to_string(), 5)]),
        })
    }

    #[test]
    fn hello_round_trip() {
        let packet = sample_hello();
        let encoded = serde_json::to_string(&packet).unwrap();
        let decoded: Packet = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, packet);
    }

    #[test]
    fn lsa_round_trip() {
        let packet = sample_lsa();
        let encoded = serde_json::to_string(&packet).unwrap();
        let decoded: Packet = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, packet);
    }

    #[test]
    fn tag_lands_in_type_field() {
        let value = serde_json::to_value(sample_lsa()).unwrap();
        assert_eq!(value["type"], "LSA");
        assert_eq!(value["router_id"], "r2");
        assert_eq!(value["sequence_number"], 4);

        let value = serde_json::to_value(sample_hello()).unwrap();
        assert_eq!(value["type"], "HELLO");
        assert_eq!(value["ip_address"], "10.0.1.1");
    }

    #[test]
    fn unknown_type_is_rejected() {
        let raw = r#"{"type":"GOODBYE","router_id":"r1","timestamp":0.0}"#;
        assert!(serde_json::from_str::<Packet>(raw).is_err());
    }

    #[test]
    fn unknown_top_level_keys_are_ignored() {
        let raw = r#"{
            "type": "HELLO",
            "router_id": "r1",
            "timestamp": 12.0,
            "ip_address": "10.0.1.1",
            "known_neighbors": [],
            "experimental_field": {"nested": true}
        }"#;
        let decoded: Packet = serde_json::from_str(raw).unwrap();
        assert_eq!(decoded.router_id(), "r1");
    }

    #[test]
    fn malformed_datagram_is_rejected() {
        assert!(serde_json::from_slice::<Packet>(b"not json at all").is_err());
        assert!(serde_json::from_str::<Packet>(r#"{"router_id":"r1"}"#).is_err());
    }
}
