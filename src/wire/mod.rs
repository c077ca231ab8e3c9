/* src/wire/mod.rs */

/**
 * @file mod.rs
 * @brief Binary request/response protocol spoken between clients and storage nodes
 */

pub mod codec;
pub mod exchange;
pub mod message;

use thiserror::Error;

pub const STATUS_OK: &str = "OK";
pub const STATUS_ERR: &str = "ERR";

#[derive(Debug, Error)]
pub enum WireError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("negative {field} on the wire: {value}")]
    Negative { field: &'static str, value: i64 },
    #[error("string of {0} bytes exceeds the {max} byte limit", max = codec::MAX_STRING_LEN)]
    StringTooLong(u64),
    #[error("malformed string length prefix")]
    BadLengthPrefix,
    #[error("string field is not valid utf-8")]
    InvalidUtf8,
    #[error("{field} of {value} does not fit the wire format")]
    OutOfRange { field: &'static str, value: u64 },
}
