/* src/cluster/mod.rs */

pub mod layout;
pub mod placement;

use crate::setup::config::Config;
use placement::Placement;
use std::time::Duration;

pub const DEFAULT_PEER_TIMEOUT: Duration = Duration::from_millis(2000);
pub const FIXED_REPLICA: usize = 2;

/// The static cluster description every process shares: node addresses in
/// placement order plus the chunking and timeout parameters.
#[derive(Debug, Clone)]
pub struct Topology {
    nodes: Vec<String>,
    chunk_size: usize,
    replica: usize,
    peer_timeout: Duration,
}

impl Topology {
    pub fn new(nodes: Vec<String>, chunk_size: usize) -> Self {
        Topology {
            nodes,
            chunk_size,
            replica: FIXED_REPLICA,
            peer_timeout: DEFAULT_PEER_TIMEOUT,
        }
    }

    pub fn with_peer_timeout(mut self, timeout: Duration) -> Self {
        self.peer_timeout = timeout;
        self
    }

    pub fn with_replica(mut self, replica: usize) -> Self {
        self.replica = replica;
        self
    }

    pub fn from_config(cfg: &Config) -> Result<Self, String> {
        if cfg.cluster.nodes.is_empty() {
            return Err("Topology error: the cluster has no nodes.".to_string());
        }
        if cfg.cluster.chunk_size == 0 {
            return Err("Topology error: chunk_size must be greater than zero.".to_string());
        }
        Ok(Topology::new(cfg.cluster.nodes.clone(), cfg.cluster.chunk_size)
            .with_replica(cfg.cluster.replica)
            .with_peer_timeout(Duration::from_millis(cfg.network.peer_timeout_ms)))
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn address(&self, index: usize) -> &str {
        &self.nodes[index]
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    // Placement always uses two slots.
    pub fn replica(&self) -> usize {
        self.replica
    }

    pub fn peer_timeout(&self) -> Duration {
        self.peer_timeout
    }

    pub fn placement(&self, part_index: u32) -> Placement {
        placement::place(part_index, self.nodes.len())
    }

    pub fn index_of_port(&self, port: u16) -> Option<usize> {
        self.nodes.iter().position(|addr| port_of(addr) == Some(port))
    }

    /// Resolves a client-supplied node reference: either the port of a
    /// configured node or a literal `host:port`.
    pub fn resolve(&self, node: &str) -> Result<String, String> {
        if let Ok(port) = node.parse::<u16>() {
            return self
                .index_of_port(port)
                .map(|index| self.nodes[index].clone())
                .ok_or_else(|| format!("No configured node listens on port {}.", port));
        }
        if port_of(node).is_some() {
            return Ok(node.to_string());
        }
        Err(format!("'{}' is neither a node port nor a host:port address.", node))
    }
}

pub fn port_of(addr: &str) -> Option<u16> {
    addr.rsplit_once(':').and_then(|(_, port)| port.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_nodes() -> Topology {
        Topology::new(
            (6060..6064).map(|p| format!("127.0.0.1:{}", p)).collect(),
            128 * 1024,
        )
    }

    #[test]
    fn finds_nodes_by_port() {
        let topology = four_nodes();
        assert_eq!(topology.index_of_port(6062), Some(2));
        assert_eq!(topology.index_of_port(7000), None);
    }

    #[test]
    fn resolves_ports_and_literal_addresses() {
        let topology = four_nodes();
        assert_eq!(topology.resolve("6061").unwrap(), "127.0.0.1:6061");
        assert_eq!(topology.resolve("10.0.0.9:9000").unwrap(), "10.0.0.9:9000");
        assert!(topology.resolve("6099").is_err());
        assert!(topology.resolve("nowhere").is_err());
    }

    #[test]
    fn placement_uses_topology_size() {
        let topology = four_nodes();
        let placement = topology.placement(3);
        assert_eq!((placement.primary, placement.backup), (3, 0));
    }
}
