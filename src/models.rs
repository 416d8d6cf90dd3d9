use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// A resolved seed address awaiting geolocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CandidateAddress {
    pub ip: IpAddr,
    pub port: u16,
}

/// A discovered node as stored in the `nodes` table and served to the front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub ip: String,
    pub port: String,
    pub lat: f64,
    pub lon: f64,
}

impl NodeRecord {
    pub fn new(candidate: &CandidateAddress, lat: f64, lon: f64) -> Self {
        Self {
            ip: candidate.ip.to_string(),
            port: candidate.port.to_string(),
            lat,
            lon,
        }
    }
}

/// Body of the front end's `GET /nodes` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodesPayload {
    pub message: Vec<NodeRecord>,
}

/// Wraps a sample of nodes in the shape the globe front end expects.
pub fn nodes_payload(nodes: Vec<NodeRecord>) -> NodesPayload {
    NodesPayload { message: nodes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_node_record_from_candidate() {
        let candidate = CandidateAddress {
            ip: IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7)),
            port: 8333,
        };
        let record = NodeRecord::new(&candidate, 52.52, 13.405);
        assert_eq!(record.ip, "203.0.113.7");
        assert_eq!(record.port, "8333");
        assert_eq!(record.lat, 52.52);
        assert_eq!(record.lon, 13.405);
    }

    #[test]
    fn test_nodes_payload_shape() {
        let payload = nodes_payload(vec![NodeRecord {
            ip: "2001:db8::1".to_string(),
            port: "8333".to_string(),
            lat: -33.86,
            lon: 151.2,
        }]);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["message"][0]["ip"], "2001:db8::1");
        assert_eq!(json["message"][0]["port"], "8333");
        assert_eq!(json["message"][0]["lat"], -33.86);
        assert_eq!(json["message"][0]["lon"], 151.2);
    }
}
