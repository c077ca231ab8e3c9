/* src/cli/upload.rs */

use crate::client::{self, ClientError};
use log::debug;
use std::path::Path;
use tokio::fs;

pub async fn execute(addr: &str, local_path: &str) -> Result<(), String> {
    let path = Path::new(local_path);
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| format!("Could not determine filename from path '{}'.", local_path))?;

    let data = fs::read(path)
        .await
        .map_err(|e| format!("Failed to read file '{}': {}", local_path, e))?;
    let size = data.len();
    let hash = super::digest(&data);
    debug!("Uploading '{}' ({} bytes) to {}", file_name, size, addr);

    match client::upload(addr, &file_name, data).await {
        Ok(()) => {
            println!("UPLOAD -> OK '{}' ({} bytes, sha256 {})", file_name, size, hash);
            Ok(())
        }
        Err(ClientError::Rejected(status)) => Err(format!("UPLOAD -> {}", status)),
        Err(e) => Err(format!("UPLOAD failed: {}", e)),
    }
}
