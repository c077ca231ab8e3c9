/* src/node/mod.rs */

pub mod bootstrap;
pub mod download;
pub mod peer;
pub mod replicate;
pub mod service;
pub mod upload;

use crate::cluster::Topology;
use crate::store::meta::META_FILE_NAME;
use crate::store::{ChunkStore, MetaStore, StoreError};
use peer::PeerClient;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

#[derive(Debug)]
pub struct NodeState {
    pub topology: Arc<Topology>,
    pub self_index: usize,
    pub chunks: ChunkStore,
    pub meta: MetaStore,
    pub peers: PeerClient,
}

impl NodeState {
    pub fn is_self(&self, index: usize) -> bool {
        index == self.self_index
    }

    pub fn self_address(&self) -> &str {
        self.topology.address(self.self_index)
    }
}

pub struct StorageNode {
    state: Arc<NodeState>,
    shutdown: Arc<Notify>,
}

impl StorageNode {
    // Must finish before the node accepts any connection.
    pub async fn open(
        topology: Arc<Topology>,
        self_index: usize,
        data_dir: impl Into<PathBuf>,
    ) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        let chunks = ChunkStore::open(&data_dir).await?;
        let meta = MetaStore::open(data_dir.join(META_FILE_NAME)).await?;
        let peers = PeerClient::new(topology.peer_timeout());
        Ok(StorageNode {
            state: Arc::new(NodeState {
                topology,
                self_index,
                chunks,
                meta,
                peers,
            }),
            shutdown: Arc::new(Notify::new()),
        })
    }

    pub fn state(&self) -> Arc<NodeState> {
        self.state.clone()
    }

    pub async fn serve(self, listener: TcpListener) {
        bootstrap::accept_loop(listener, self.state, self.shutdown).await;
    }
}
