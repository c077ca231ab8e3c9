/* src/launch.rs */

use crate::cluster::{Topology, port_of};
use crate::setup::check::validate_client_config;
use crate::setup::config::Config;
use log::{error, info, warn};
use std::env;
use std::io::ErrorKind;
use tokio::fs;
use tokio::process::{Child, Command};
use tokio::signal;

/// Wipes the storage root, starts one node process per configured address on
/// this machine and keeps them running until Ctrl-C.
pub async fn run(cfg: &Config, config_path: &str) -> Result<(), String> {
    validate_client_config(cfg)?;
    let topology = Topology::from_config(cfg)?;

    clear_storage(&cfg.setup.storage_root).await?;
    println!("> Storage root '{}' cleared.", cfg.setup.storage_root);

    let exe = env::current_exe().map_err(|e| format!("Cannot locate own executable: {}", e))?;
    let mut children: Vec<(u16, Child)> = Vec::with_capacity(topology.len());
    for addr in topology.nodes() {
        let Some(port) = port_of(addr) else {
            warn!("! Skipping '{}': no port.", addr);
            continue;
        };
        let spawned = Command::new(&exe)
            .arg("-c")
            .arg(config_path)
            .arg("node")
            .arg(port.to_string())
            .kill_on_drop(true)
            .spawn();
        match spawned {
            Ok(child) => {
                println!("-> Node {} started (pid {}).", port, child.id().unwrap_or_default());
                children.push((port, child));
            }
            Err(e) => error!("! Failed to start node {}: {}", port, e),
        }
    }

    if children.is_empty() {
        return Err("No node could be started.".to_string());
    }
    println!("+ {} node(s) running. Press Ctrl-C to stop them.", children.len());

    signal::ctrl_c()
        .await
        .map_err(|e| format!("Failed to wait for Ctrl-C: {}", e))?;

    for (port, mut child) in children {
        match child.kill().await {
            Ok(()) => info!("- Node {} stopped.", port),
            // Already gone, e.g. after a SHUTDOWN request.
            Err(e) if e.kind() == ErrorKind::InvalidInput => {}
            Err(e) => warn!("! Could not stop node {}: {}", port, e),
        }
    }
    println!("- Launcher finished.");
    Ok(())
}

async fn clear_storage(root: &str) -> Result<(), String> {
    match fs::remove_dir_all(root).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(format!("Failed to clear storage root '{}': {}", root, e)),
    }
    fs::create_dir_all(root)
        .await
        .map_err(|e| format!("Failed to create storage root '{}': {}", root, e))
}
