/* src/wire/codec.rs */

// Encoders append to a message buffer; decoders pull straight from the stream.

use super::WireError;
use std::io::{Error, ErrorKind};
use tokio::io::{AsyncRead, AsyncReadExt};

pub const MAX_STRING_LEN: u64 = 64 * 1024;

// A u32 never needs more than five 7-bit groups.
const MAX_PREFIX_BYTES: u32 = 5;

pub fn put_len_prefix(buf: &mut Vec<u8>, mut len: u64) {
    while len >= 0x80 {
        buf.push((len as u8 & 0x7F) | 0x80);
        len >>= 7;
    }
    buf.push(len as u8);
}

pub fn put_string(buf: &mut Vec<u8>, value: &str) -> Result<(), WireError> {
    let bytes = value.as_bytes();
    if bytes.len() as u64 > MAX_STRING_LEN {
        return Err(WireError::StringTooLong(bytes.len() as u64));
    }
    put_len_prefix(buf, bytes.len() as u64);
    buf.extend_from_slice(bytes);
    Ok(())
}

pub fn put_i32(buf: &mut Vec<u8>, value: i32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

pub fn put_i64(buf: &mut Vec<u8>, value: i64) {
    buf.extend_from_slice(&value.to_le_bytes());
}

pub fn to_i32(field: &'static str, value: u64) -> Result<i32, WireError> {
    i32::try_from(value).map_err(|_| WireError::OutOfRange { field, value })
}

pub fn put_block(buf: &mut Vec<u8>, bytes: &[u8]) -> Result<(), WireError> {
    put_i32(buf, to_i32("block length", bytes.len() as u64)?);
    buf.extend_from_slice(bytes);
    Ok(())
}

pub async fn read_len_prefix<R: AsyncRead + Unpin>(reader: &mut R) -> Result<u64, WireError> {
    let mut value = 0u64;
    for group in 0..MAX_PREFIX_BYTES {
        let byte = reader.read_u8().await?;
        value |= u64::from(byte & 0x7F) << (7 * group);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(WireError::BadLengthPrefix)
}

pub async fn read_string<R: AsyncRead + Unpin>(reader: &mut R) -> Result<String, WireError> {
    let len = read_len_prefix(reader).await?;
    if len > MAX_STRING_LEN {
        return Err(WireError::StringTooLong(len));
    }
    let mut buf = vec![0u8; len as usize];
    reader.read_exact(&mut buf).await?;
    String::from_utf8(buf).map_err(|_| WireError::InvalidUtf8)
}

pub async fn read_i32<R: AsyncRead + Unpin>(reader: &mut R) -> Result<i32, WireError> {
    Ok(reader.read_i32_le().await?)
}

pub async fn read_i64<R: AsyncRead + Unpin>(reader: &mut R) -> Result<i64, WireError> {
    Ok(reader.read_i64_le().await?)
}

pub async fn read_count<R: AsyncRead + Unpin>(
    reader: &mut R,
    field: &'static str,
) -> Result<u32, WireError> {
    let value = read_i32(reader).await?;
    u32::try_from(value).map_err(|_| WireError::Negative {
        field,
        value: value.into(),
    })
}

// Grows with the data received, so a lying length prefix cannot force a huge allocation.
pub async fn read_raw<R: AsyncRead + Unpin>(reader: &mut R, len: u32) -> Result<Vec<u8>, WireError> {
    let mut buf = Vec::new();
    let received = (&mut *reader).take(u64::from(len)).read_to_end(&mut buf).await?;
    if received != len as usize {
        return Err(Error::new(
            ErrorKind::UnexpectedEof,
            format!("expected {} bytes, stream ended after {}", len, received),
        )
        .into());
    }
    Ok(buf)
}

pub async fn read_block<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Vec<u8>, WireError> {
    let len = read_count(reader, "block length").await?;
    read_raw(reader, len).await
}
