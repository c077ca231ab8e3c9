/* src/node/service.rs */

use crate::node::{NodeState, download, upload};
use crate::store::FileMeta;
use crate::wire::message::{Reply, Request};
use log::{debug, info, warn};
use std::net::SocketAddr;
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::net::TcpStream;
use tokio::sync::Notify;

pub async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    state: Arc<NodeState>,
    shutdown: Arc<Notify>,
) {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let request = match Request::read_from(&mut reader).await {
        Ok(request) => request,
        Err(e) => {
            warn!("! Malformed request from {}: {}. Closing.", peer, e);
            return;
        }
    };
    debug!("-> {} from {}", request.command_name(), peer);

    let (reply, stop) = match dispatch(request, &state).await {
        ControlFlow::Continue(reply) => (reply, false),
        ControlFlow::Break(reply) => (reply, true),
    };

    if let Err(e) = reply.write_to(&mut write_half).await {
        warn!("! Failed to send reply to {}: {}", peer, e);
    }

    if stop {
        shutdown.notify_one();
    }
}

pub async fn dispatch(request: Request, state: &NodeState) -> ControlFlow<Reply, Reply> {
    let reply = match request {
        Request::Upload { filename, data } => upload::handle_upload(state, &filename, &data).await,
        Request::PutPart { filename, index, data } => {
            handle_put_part(state, &filename, index, &data).await
        }
        Request::GetPart { filename, index } => handle_get_part(state, &filename, index).await,
        Request::PutMeta { filename, meta } => handle_put_meta(state, &filename, meta).await,
        Request::List => Reply::Listing(state.meta.list().await),
        Request::Download { filename } => download::handle_download(state, &filename).await,
        Request::Shutdown => {
            info!("> Node {} shutting down on request.", state.self_address());
            return ControlFlow::Break(Reply::Ok);
        }
        Request::Unknown(name) => {
            warn!("! Unknown command {:?}", name);
            Reply::err("Unknown command")
        }
    };
    ControlFlow::Continue(reply)
}

async fn handle_put_part(state: &NodeState, filename: &str, index: u32, data: &[u8]) -> Reply {
    match state.chunks.put_part(filename, index, data).await {
        Ok(()) => {
            debug!("   - Stored part {} of '{}' ({} bytes).", index, filename, data.len());
            Reply::Ok
        }
        Err(e) => {
            warn!("! Could not store part {} of '{}': {}", index, filename, e);
            Reply::bare_err()
        }
    }
}

async fn handle_get_part(state: &NodeState, filename: &str, index: u32) -> Reply {
    match state.chunks.get_part(filename, index).await {
        Ok(Some(data)) => Reply::Blob(data),
        Ok(None) => Reply::bare_err(),
        Err(e) => {
            warn!("! Could not read part {} of '{}': {}", index, filename, e);
            Reply::bare_err()
        }
    }
}

// Metadata from a peer is applied locally only; it is never re-broadcast.
async fn handle_put_meta(state: &NodeState, filename: &str, meta: FileMeta) -> Reply {
    match state.meta.put(filename, meta).await {
        Ok(()) => {
            debug!("   - Metadata for '{}' updated: {:?}", filename, meta);
            Reply::Ok
        }
        Err(e) => {
            warn!("! Could not record metadata for '{}': {}", filename, e);
            Reply::bare_err()
        }
    }
}
