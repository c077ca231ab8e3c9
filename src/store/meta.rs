/* src/store/meta.rs */

use super::{StoreError, validate_name};
use log::warn;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs as tokio_fs;
use tokio::sync::Mutex;

pub const META_FILE_NAME: &str = "metadata.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMeta {
    pub parts: u32,
    pub total_size: u64,
}

/// The node's catalogue of known files, mirrored to a flat
/// `name|parts|size` log that is rewritten in full on every update.
#[derive(Debug)]
pub struct MetaStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, FileMeta>>,
}

impl MetaStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match tokio_fs::read_to_string(&path).await {
            Ok(text) => parse_mirror(&text),
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(MetaStore {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // The mirror is rewritten before the lock is released.
    pub async fn put(&self, name: &str, meta: FileMeta) -> Result<(), StoreError> {
        validate_name(name)?;
        let mut entries = self.entries.lock().await;
        entries.insert(name.to_string(), meta);
        self.persist(&entries).await
    }

    pub async fn get(&self, name: &str) -> Option<FileMeta> {
        self.entries.lock().await.get(name).copied()
    }

    pub async fn list(&self) -> Vec<String> {
        self.entries.lock().await.keys().cloned().collect()
    }

    async fn persist(&self, entries: &BTreeMap<String, FileMeta>) -> Result<(), StoreError> {
        let tmp_path = self.path.with_extension("db.tmp");
        tokio_fs::write(&tmp_path, render_mirror(entries)).await?;
        tokio_fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

pub fn render_mirror(entries: &BTreeMap<String, FileMeta>) -> String {
    let mut text = String::new();
    for (name, meta) in entries {
        text.push_str(&format!("{}|{}|{}\n", name, meta.parts, meta.total_size));
    }
    text
}

pub fn parse_mirror(text: &str) -> BTreeMap<String, FileMeta> {
    let mut entries = BTreeMap::new();
    for (line_no, line) in text.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('|').collect();
        let [name, parts, size] = fields.as_slice() else {
            warn!("! Metadata line {} has {} fields, skipping.", line_no + 1, fields.len());
            continue;
        };
        match (parts.parse::<u32>(), size.parse::<u64>()) {
            (Ok(parts), Ok(total_size)) => {
                entries.insert(name.to_string(), FileMeta { parts, total_size });
            }
            _ => warn!("! Metadata line {} has unreadable numbers, skipping.", line_no + 1),
        }
    }
    entries
}
