/* src/cli/download.rs */

use crate::client::{self, ClientError};
use tokio::fs;

pub async fn execute(addr: &str, filename: &str, output: &str) -> Result<(), String> {
    let data = match client::download(addr, filename).await {
        Ok(data) => data,
        Err(ClientError::Rejected(status)) => return Err(format!("DOWNLOAD -> {}", status)),
        Err(e) => return Err(format!("DOWNLOAD failed: {}", e)),
    };

    fs::write(output, &data)
        .await
        .map_err(|e| format!("Failed to write '{}': {}", output, e))?;
    println!(
        "DOWNLOAD OK -> {} ({} bytes, sha256 {})",
        output,
        data.len(),
        super::digest(&data)
    );
    Ok(())
}
