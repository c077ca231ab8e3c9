/* src/node/replicate.rs */

use crate::node::NodeState;
use crate::store::FileMeta;
use log::{debug, error, warn};
use tokio::task::JoinSet;

// Best-effort: outcomes are only logged, never retried.
pub async fn broadcast_meta(state: &NodeState, filename: &str, meta: FileMeta) {
    let mut pending = JoinSet::new();
    for (index, addr) in state.topology.nodes().iter().enumerate() {
        if state.is_self(index) {
            continue;
        }
        let peers = state.peers.clone();
        let addr = addr.clone();
        let filename = filename.to_string();
        pending.spawn(async move {
            let result = peers.put_meta(&addr, &filename, meta).await;
            (addr, result)
        });
    }

    while let Some(joined) = pending.join_next().await {
        match joined {
            Ok((addr, Ok(()))) => debug!("   - Metadata for '{}' -> {}", filename, addr),
            Ok((addr, Err(e))) => warn!("! Metadata for '{}' not delivered to {}: {}", filename, addr, e),
            Err(e) => error!("! Metadata broadcast task failed: {}", e),
        }
    }
}
