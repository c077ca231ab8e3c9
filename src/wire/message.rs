/* src/wire/message.rs */

use super::codec::{
    put_block, put_i32, put_i64, put_string, read_block, read_count, read_i64, read_raw,
    read_string, to_i32,
};
use super::{STATUS_ERR, STATUS_OK, WireError};
use crate::store::FileMeta;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

// Command vocabulary. Every request starts with one of these names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Upload,
    PutPart,
    GetPart,
    PutMeta,
    List,
    Download,
    Shutdown,
}

impl Command {
    pub fn name(self) -> &'static str {
        match self {
            Command::Upload => "UPLOAD",
            Command::PutPart => "PUT_PART",
            Command::GetPart => "GET_PART",
            Command::PutMeta => "PUT_META",
            Command::List => "LIST",
            Command::Download => "DOWNLOAD",
            Command::Shutdown => "SHUTDOWN",
        }
    }
}

impl TryFrom<&str> for Command {
    type Error = ();

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        match name {
            "UPLOAD" => Ok(Command::Upload),
            "PUT_PART" => Ok(Command::PutPart),
            "GET_PART" => Ok(Command::GetPart),
            "PUT_META" => Ok(Command::PutMeta),
            // older clients spell it LISTALL
            "LIST" | "LISTALL" => Ok(Command::List),
            "DOWNLOAD" => Ok(Command::Download),
            "SHUTDOWN" => Ok(Command::Shutdown),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Upload { filename: String, data: Vec<u8> },
    PutPart { filename: String, index: u32, data: Vec<u8> },
    GetPart { filename: String, index: u32 },
    PutMeta { filename: String, meta: FileMeta },
    List,
    Download { filename: String },
    Shutdown,
    /// A command name this node does not understand. Its body, if any, is left unread.
    Unknown(String),
}

/// What follows the status string of a successful reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyShape {
    Status,
    Blob,
    Listing,
}

impl Request {
    pub fn command_name(&self) -> &str {
        match self {
            Request::Upload { .. } => Command::Upload.name(),
            Request::PutPart { .. } => Command::PutPart.name(),
            Request::GetPart { .. } => Command::GetPart.name(),
            Request::PutMeta { .. } => Command::PutMeta.name(),
            Request::List => Command::List.name(),
            Request::Download { .. } => Command::Download.name(),
            Request::Shutdown => Command::Shutdown.name(),
            Request::Unknown(name) => name,
        }
    }

    pub fn reply_shape(&self) -> ReplyShape {
        match self {
            Request::GetPart { .. } | Request::Download { .. } => ReplyShape::Blob,
            Request::List => ReplyShape::Listing,
            _ => ReplyShape::Status,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, WireError> {
        let mut buf = Vec::new();
        put_string(&mut buf, self.command_name())?;
        match self {
            Request::Upload { filename, data } => {
                put_string(&mut buf, filename)?;
                put_block(&mut buf, data)?;
            }
            Request::PutPart { filename, index, data } => {
                put_string(&mut buf, filename)?;
                put_i32(&mut buf, to_i32("part index", u64::from(*index))?);
                put_block(&mut buf, data)?;
            }
            Request::GetPart { filename, index } => {
                put_string(&mut buf, filename)?;
                put_i32(&mut buf, to_i32("part index", u64::from(*index))?);
            }
            Request::PutMeta { filename, meta } => {
                put_string(&mut buf, filename)?;
                put_i32(&mut buf, to_i32("part count", u64::from(meta.parts))?);
                let total = i64::try_from(meta.total_size).map_err(|_| WireError::OutOfRange {
                    field: "total size",
                    value: meta.total_size,
                })?;
                put_i64(&mut buf, total);
            }
            Request::Download { filename } => put_string(&mut buf, filename)?,
            Request::List | Request::Shutdown | Request::Unknown(_) => {}
        }
        Ok(buf)
    }

    pub async fn write_to<W: AsyncWrite + Unpin>(&self, writer: &mut W) -> Result<(), WireError> {
        writer.write_all(&self.encode()?).await?;
        writer.flush().await?;
        Ok(())
    }

    pub async fn read_from<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Self, WireError> {
        let name = read_string(reader).await?;
        let command = match Command::try_from(name.as_str()) {
            Ok(command) => command,
            Err(()) => return Ok(Request::Unknown(name)),
        };

        let request = match command {
            Command::Upload => {
                let filename = read_string(reader).await?;
                let data = read_block(reader).await?;
                Request::Upload { filename, data }
            }
            Command::PutPart => {
                let filename = read_string(reader).await?;
                let index = read_count(reader, "part index").await?;
                let data = read_block(reader).await?;
                Request::PutPart { filename, index, data }
            }
            Command::GetPart => {
                let filename = read_string(reader).await?;
                let index = read_count(reader, "part index").await?;
                Request::GetPart { filename, index }
            }
            Command::PutMeta => {
                let filename = read_string(reader).await?;
                let parts = read_count(reader, "part count").await?;
                let total = read_i64(reader).await?;
                let total_size = u64::try_from(total).map_err(|_| WireError::Negative {
                    field: "total size",
                    value: total,
                })?;
                Request::PutMeta {
                    filename,
                    meta: FileMeta { parts, total_size },
                }
            }
            Command::List => Request::List,
            Command::Download => Request::Download {
                filename: read_string(reader).await?,
            },
            Command::Shutdown => Request::Shutdown,
        };
        Ok(request)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Ok,
    Blob(Vec<u8>),
    Listing(Vec<String>),
    Err(String),
}

impl Reply {
    pub fn err(reason: impl AsRef<str>) -> Self {
        Reply::Err(format!("{} {}", STATUS_ERR, reason.as_ref()))
    }

    pub fn bare_err() -> Self {
        Reply::Err(STATUS_ERR.to_string())
    }

    pub fn encode(&self) -> Result<Vec<u8>, WireError> {
        let mut buf = Vec::new();
        match self {
            Reply::Ok => put_string(&mut buf, STATUS_OK)?,
            Reply::Blob(data) => {
                put_string(&mut buf, STATUS_OK)?;
                put_block(&mut buf, data)?;
            }
            Reply::Listing(names) => {
                put_string(&mut buf, STATUS_OK)?;
                put_i32(&mut buf, to_i32("file count", names.len() as u64)?);
                for name in names {
                    put_string(&mut buf, name)?;
                }
            }
            Reply::Err(status) => put_string(&mut buf, status)?,
        }
        Ok(buf)
    }

    pub async fn write_to<W: AsyncWrite + Unpin>(&self, writer: &mut W) -> Result<(), WireError> {
        writer.write_all(&self.encode()?).await?;
        writer.flush().await?;
        Ok(())
    }

    pub async fn read_from<R: AsyncRead + Unpin>(
        reader: &mut R,
        shape: ReplyShape,
    ) -> Result<Self, WireError> {
        let status = read_string(reader).await?;
        if status != STATUS_OK {
            return Ok(Reply::Err(status));
        }
        let reply = match shape {
            ReplyShape::Status => Reply::Ok,
            ReplyShape::Blob => {
                let len = read_count(reader, "block length").await?;
                Reply::Blob(read_raw(reader, len).await?)
            }
            ReplyShape::Listing => {
                let count = read_count(reader, "file count").await?;
                let mut names = Vec::with_capacity(count.min(1024) as usize);
                for _ in 0..count {
                    names.push(read_string(reader).await?);
                }
                Reply::Listing(names)
            }
        };
        Ok(reply)
    }
}
