/* src/cli/shutdown.rs */

use crate::client;

pub async fn execute(addr: &str) -> Result<(), String> {
    client::shutdown(addr)
        .await
        .map_err(|e| format!("SHUTDOWN failed: {}", e))?;
    println!("SHUTDOWN -> OK ({})", addr);
    Ok(())
}
