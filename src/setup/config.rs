/* src/setup/config.rs */

use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SetupConfig {
    pub log_level: String,
    pub storage_root: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NetworkConfig {
    pub listen: String,
    #[serde(default = "default_peer_timeout_ms")]
    pub peer_timeout_ms: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ClusterConfig {
    pub chunk_size: usize,
    #[serde(default = "default_replica")]
    pub replica: usize,
    pub nodes: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Config {
    pub setup: SetupConfig,
    pub network: NetworkConfig,
    pub cluster: ClusterConfig,
}

fn default_peer_timeout_ms() -> u64 {
    2000
}

fn default_replica() -> usize {
    2
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, String> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path, e))?;
        Self::from_toml_str(&content).map_err(|e| format!("{} (in '{}')", e, path))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse config: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[setup]
log_level = "debug"
storage_root = "storage"

[network]
listen = "0.0.0.0"

[cluster]
chunk_size = 131072
nodes = ["127.0.0.1:6060", "127.0.0.1:6061"]
"#;

    #[test]
    fn defaults_fill_optional_fields() {
        let cfg = Config::from_toml_str(SAMPLE).expect("parse");
        assert_eq!(cfg.network.peer_timeout_ms, 2000);
        assert_eq!(cfg.cluster.replica, 2);
        assert_eq!(cfg.cluster.nodes.len(), 2);
        assert_eq!(cfg.setup.log_level, "debug");
    }

    #[test]
    fn missing_section_is_reported() {
        let err = Config::from_toml_str("[setup]\nlog_level = \"info\"\n").unwrap_err();
        assert!(err.starts_with("Failed to parse config"));
    }
}
