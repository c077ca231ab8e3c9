/* src/setup/check.rs */

use super::config::{ClusterConfig, Config};
use crate::cluster::port_of;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use uuid::Uuid;

// Main validation entry point for node processes
pub fn validate_node_config(config: &Config) -> Result<(), String> {
    println!("> Performing node configuration checks...");
    validate_cluster(&config.cluster)?;
    validate_storage_root(&config.setup.storage_root)?;
    println!("+ Configuration checks passed successfully.");
    Ok(())
}

// Clients and the launcher only need a usable topology
pub fn validate_client_config(config: &Config) -> Result<(), String> {
    validate_cluster(&config.cluster)
}

pub fn validate_cluster(cluster: &ClusterConfig) -> Result<(), String> {
    if cluster.nodes.is_empty() {
        return Err(
            "Configuration error: 'cluster.nodes' is empty. At least one node address must be listed."
                .to_string(),
        );
    }
    if cluster.chunk_size == 0 || cluster.chunk_size > i32::MAX as usize {
        return Err(format!(
            "Configuration error: chunk_size {} is out of range (1..={}).",
            cluster.chunk_size,
            i32::MAX
        ));
    }
    validate_node_addresses(&cluster.nodes)
}

// Every entry must be host:port. A node finds itself by port, so ports are unique.
fn validate_node_addresses(nodes: &[String]) -> Result<(), String> {
    let re = Regex::new(r"^[a-zA-Z0-9_.-]+:[0-9]{1,5}$").map_err(|e| e.to_string())?;
    let mut seen = HashSet::new();
    let mut ports = HashSet::new();
    for addr in nodes {
        let port = match port_of(addr) {
            Some(port) if re.is_match(addr) => port,
            _ => {
                return Err(format!(
                    "Configuration error: node address '{}' must look like host:port.",
                    addr
                ));
            }
        };
        if !seen.insert(addr) {
            return Err(format!(
                "Configuration error: node address '{}' is listed twice.",
                addr
            ));
        }
        if !ports.insert(port) {
            return Err(format!(
                "Configuration error: port {} of '{}' is listed twice.",
                port, addr
            ));
        }
    }
    Ok(())
}

// storage_root must exist (or be creatable) and be writable
fn validate_storage_root(storage_root: &str) -> Result<(), String> {
    let path = Path::new(storage_root);
    if fs::create_dir_all(path).is_err() || !path.is_dir() {
        return Err(format!(
            "Configuration error: storage_root '{}' does not exist and could not be created.",
            storage_root
        ));
    }

    // Attempt to write and delete a temporary file
    let temp_path = path.join(format!("chunkr-write-check-{}.tmp", Uuid::new_v4()));
    if fs::write(&temp_path, "test").is_err() {
        return Err(format!(
            "Configuration error: No write permission for storage_root '{}'.",
            storage_root
        ));
    }
    if fs::remove_file(&temp_path).is_err() {
        return Err(format!(
            "Configuration error: Failed to clean up temporary file in storage_root '{}'. Check permissions.",
            storage_root
        ));
    }
    Ok(())
}
