/* src/node/upload.rs */

use crate::cluster::layout::{part_count, part_range};
use crate::node::{NodeState, replicate};
use crate::store::{FileMeta, validate_name};
use crate::wire::message::Reply;
use log::{debug, error, info, warn};

pub async fn handle_upload(state: &NodeState, filename: &str, data: &[u8]) -> Reply {
    if let Err(e) = validate_name(filename) {
        warn!("! Refusing upload: {}", e);
        return Reply::err("Invalid filename");
    }

    let chunk_size = state.topology.chunk_size();
    let total_size = data.len() as u64;
    let meta = FileMeta {
        parts: part_count(total_size, chunk_size),
        total_size,
    };
    info!(
        "-> Upload of '{}' ({} bytes, {} part(s)).",
        filename, total_size, meta.parts
    );

    if let Err(e) = state.meta.put(filename, meta).await {
        error!("! Could not record metadata for '{}': {}", filename, e);
        return Reply::err("Metadata write failed");
    }
    replicate::broadcast_meta(state, filename, meta).await;

    let mut degraded = 0u32;
    for index in 0..meta.parts {
        let chunk = &data[part_range(index, total_size, chunk_size)];
        if !distribute_part(state, filename, index, chunk).await {
            degraded += 1;
        }
    }

    if degraded == 0 {
        info!("+ Upload of '{}' distributed.", filename);
    } else {
        warn!(
            "! Upload of '{}' finished with {} part(s) below full redundancy.",
            filename, degraded
        );
    }
    Reply::Ok
}

async fn distribute_part(state: &NodeState, filename: &str, index: u32, chunk: &[u8]) -> bool {
    let mut all_stored = true;
    for target in state.topology.placement(index).targets() {
        if push_part(state, target, filename, index, chunk).await {
            debug!("   - Part {} -> {}", index, state.topology.address(target));
        } else {
            all_stored = false;
        }
    }
    all_stored
}

async fn push_part(state: &NodeState, target: usize, filename: &str, index: u32, chunk: &[u8]) -> bool {
    if state.is_self(target) {
        return match state.chunks.put_part(filename, index, chunk).await {
            Ok(()) => true,
            Err(e) => {
                warn!("! Failed to store part {} locally: {}", index, e);
                false
            }
        };
    }

    let addr = state.topology.address(target);
    match state.peers.put_part(addr, filename, index, chunk).await {
        Ok(()) => true,
        Err(e) => {
            warn!("! Failed to send part {} to {}: {}", index, addr, e);
            false
        }
    }
}
