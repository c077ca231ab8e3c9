/* src/node/peer.rs */

use crate::store::FileMeta;
use crate::wire::WireError;
use crate::wire::exchange::round_trip;
use crate::wire::message::{Reply, Request};
use std::time::Duration;
use thiserror::Error;
use tokio::time;

#[derive(Debug, Error)]
pub enum PeerError {
    #[error("no answer within {0:?}")]
    Timeout(Duration),
    #[error("{0}")]
    Wire(#[from] WireError),
    #[error("peer answered {0:?}")]
    Rejected(String),
    #[error("peer sent a reply of the wrong shape")]
    Unexpected,
}

// Every call is bounded by the peer timeout, connect included.
#[derive(Debug, Clone)]
pub struct PeerClient {
    timeout: Duration,
}

impl PeerClient {
    pub fn new(timeout: Duration) -> Self {
        PeerClient { timeout }
    }

    pub async fn put_part(
        &self,
        addr: &str,
        filename: &str,
        index: u32,
        data: &[u8],
    ) -> Result<(), PeerError> {
        let request = Request::PutPart {
            filename: filename.to_string(),
            index,
            data: data.to_vec(),
        };
        match self.call(addr, &request).await? {
            Reply::Ok => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    pub async fn get_part(&self, addr: &str, filename: &str, index: u32) -> Result<Vec<u8>, PeerError> {
        let request = Request::GetPart {
            filename: filename.to_string(),
            index,
        };
        match self.call(addr, &request).await? {
            Reply::Blob(data) => Ok(data),
            other => Err(unexpected(other)),
        }
    }

    pub async fn put_meta(&self, addr: &str, filename: &str, meta: FileMeta) -> Result<(), PeerError> {
        let request = Request::PutMeta {
            filename: filename.to_string(),
            meta,
        };
        match self.call(addr, &request).await? {
            Reply::Ok => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    async fn call(&self, addr: &str, request: &Request) -> Result<Reply, PeerError> {
        match time::timeout(self.timeout, round_trip(addr, request)).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(PeerError::Timeout(self.timeout)),
        }
    }
}

fn unexpected(reply: Reply) -> PeerError {
    match reply {
        Reply::Err(status) => PeerError::Rejected(status),
        _ => PeerError::Unexpected,
    }
}
