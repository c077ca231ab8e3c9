/* src/node/bootstrap.rs */

use crate::cluster::{FIXED_REPLICA, Topology};
use crate::node::{NodeState, StorageNode, service};
use crate::setup::check::validate_node_config;
use crate::setup::config::Config;
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

pub async fn start_node(cfg: Config, port: u16) -> Result<(), String> {
    validate_node_config(&cfg)?;
    let topology = Arc::new(Topology::from_config(&cfg)?);
    let self_index = topology
        .index_of_port(port)
        .ok_or_else(|| format!("Port {} is not part of the configured cluster.", port))?;

    if topology.replica() != FIXED_REPLICA {
        warn!(
            "! replica = {} is configured, but chunks are always placed on {} nodes.",
            topology.replica(),
            FIXED_REPLICA
        );
    }

    let data_dir = Path::new(&cfg.setup.storage_root).join(format!("node_{}", port));
    let node = StorageNode::open(topology.clone(), self_index, &data_dir)
        .await
        .map_err(|e| format!("Failed to open storage at {}: {}", data_dir.display(), e))?;

    let bind_addr = format!("{}:{}", cfg.network.listen, port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("Failed to bind {}: {}", bind_addr, e))?;

    println!("> Node {} running on {}", self_index, bind_addr);
    println!("> Cluster: [{}]", topology.nodes().join(", "));
    println!(
        "> Chunk size: {} bytes, storage: {}",
        topology.chunk_size(),
        data_dir.display()
    );

    node.serve(listener).await;
    println!("- Node {} stopped.", self_index);
    Ok(())
}

// Returns once SHUTDOWN has been answered; in-flight requests are not awaited.
pub async fn accept_loop(listener: TcpListener, state: Arc<NodeState>, shutdown: Arc<Notify>) {
    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                info!("> Accept loop on {} stopped.", state.self_address());
                break;
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    let state = state.clone();
                    let shutdown = shutdown.clone();
                    tokio::spawn(async move {
                        service::handle_connection(stream, peer, state, shutdown).await;
                    });
                }
                Err(e) => warn!("! Failed to accept connection: {}", e),
            },
        }
    }
}
