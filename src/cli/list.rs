/* src/cli/list.rs */

use crate::client::{self, ClientError};

pub async fn execute(addr: &str) -> Result<(), String> {
    match client::list(addr).await {
        Ok(names) => {
            println!("Files in the system:");
            for name in names {
                println!(" - {}", name);
            }
            Ok(())
        }
        Err(ClientError::Rejected(status)) => Err(format!("LIST -> {}", status)),
        Err(e) => Err(format!("LIST failed: {}", e)),
    }
}
