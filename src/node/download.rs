/* src/node/download.rs */

use crate::node::NodeState;
use crate::wire::message::Reply;
use log::{debug, info, warn};

// Upper bound on the buffer reserved before any part has arrived.
const MAX_PREALLOC: u64 = 64 * 1024 * 1024;

pub async fn handle_download(state: &NodeState, filename: &str) -> Reply {
    let Some(meta) = state.meta.get(filename).await else {
        return Reply::err("No such file");
    };
    info!("-> Download of '{}' ({} part(s)).", filename, meta.parts);

    let mut assembled = Vec::with_capacity(meta.total_size.min(MAX_PREALLOC) as usize);
    for index in 0..meta.parts {
        match fetch_part(state, filename, index).await {
            Some(part) => assembled.extend_from_slice(&part),
            None => {
                warn!("! Download of '{}' failed: part {} unavailable.", filename, index);
                return Reply::err(format!("Missing part {}", index));
            }
        }
    }

    info!("+ Download of '{}' assembled ({} bytes).", filename, assembled.len());
    Reply::Blob(assembled)
}

// primary first; the backup only when the primary cannot deliver
pub async fn fetch_part(state: &NodeState, filename: &str, index: u32) -> Option<Vec<u8>> {
    for target in state.topology.placement(index).targets() {
        if let Some(part) = fetch_from(state, target, filename, index).await {
            return Some(part);
        }
    }
    None
}

async fn fetch_from(state: &NodeState, target: usize, filename: &str, index: u32) -> Option<Vec<u8>> {
    if state.is_self(target) {
        return match state.chunks.get_part(filename, index).await {
            Ok(Some(part)) => Some(part),
            Ok(None) => {
                debug!("   - Part {} of '{}' is not held locally.", index, filename);
                None
            }
            Err(e) => {
                warn!("! Failed to read part {} locally: {}", index, e);
                None
            }
        };
    }

    let addr = state.topology.address(target);
    match state.peers.get_part(addr, filename, index).await {
        Ok(part) => Some(part),
        Err(e) => {
            warn!("! Part {} of '{}' unavailable from {}: {}", index, filename, addr, e);
            None
        }
    }
}
