/* src/store/mod.rs */

pub mod chunks;
pub mod meta;

pub use chunks::ChunkStore;
pub use meta::{FileMeta, MetaStore};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unusable file name {0:?}")]
    InvalidName(String),
}

/// File names become part of chunk paths and metadata log lines, so anything
/// that could leave the node directory or split a log line is refused.
pub fn validate_name(name: &str) -> Result<(), StoreError> {
    let unusable = name.is_empty()
        || name == "."
        || name == ".."
        || name
            .chars()
            .any(|c| matches!(c, '/' | '\\' | '|' | '\0' | '\r' | '\n'));
    if unusable {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}
