/* src/store/chunks.rs */

use super::{StoreError, validate_name};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs as tokio_fs;

// No locking: concurrent writers of one chunk race, last write wins.
#[derive(Debug, Clone)]
pub struct ChunkStore {
    dir: PathBuf,
}

impl ChunkStore {
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        tokio_fs::create_dir_all(&dir).await?;
        Ok(ChunkStore { dir })
    }

    fn part_path(&self, name: &str, index: u32) -> Result<PathBuf, StoreError> {
        validate_name(name)?;
        Ok(self.dir.join(format!("{}.part{}", name, index)))
    }

    pub async fn put_part(&self, name: &str, index: u32, data: &[u8]) -> Result<(), StoreError> {
        let path = self.part_path(name, index)?;
        tokio_fs::write(path, data).await?;
        Ok(())
    }

    pub async fn get_part(&self, name: &str, index: u32) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.part_path(name, index)?;
        match tokio_fs::read(path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
