/* src/client/mod.rs */

/**
 * @file mod.rs
 * @brief One-shot requests a user issues against any single node
 */

use crate::wire::WireError;
use crate::wire::exchange::round_trip;
use crate::wire::message::{Reply, Request};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("communication error: {0}")]
    Wire(#[from] WireError),
    #[error("{0}")]
    Rejected(String),
    #[error("node sent a reply of the wrong shape")]
    Unexpected,
}

// Client calls wait as long as the node takes; a node-side UPLOAD can itself
// be waiting on several peer timeouts.

pub async fn upload(addr: &str, filename: &str, data: Vec<u8>) -> Result<(), ClientError> {
    let request = Request::Upload {
        filename: filename.to_string(),
        data,
    };
    match round_trip(addr, &request).await? {
        Reply::Ok => Ok(()),
        other => Err(rejected(other)),
    }
}

pub async fn list(addr: &str) -> Result<Vec<String>, ClientError> {
    match round_trip(addr, &Request::List).await? {
        Reply::Listing(names) => Ok(names),
        other => Err(rejected(other)),
    }
}

pub async fn download(addr: &str, filename: &str) -> Result<Vec<u8>, ClientError> {
    let request = Request::Download {
        filename: filename.to_string(),
    };
    match round_trip(addr, &request).await? {
        Reply::Blob(data) => Ok(data),
        other => Err(rejected(other)),
    }
}

pub async fn shutdown(addr: &str) -> Result<(), ClientError> {
    match round_trip(addr, &Request::Shutdown).await? {
        Reply::Ok => Ok(()),
        other => Err(rejected(other)),
    }
}

fn rejected(reply: Reply) -> ClientError {
    match reply {
        Reply::Err(status) => ClientError::Rejected(status),
        _ => ClientError::Unexpected,
    }
}
