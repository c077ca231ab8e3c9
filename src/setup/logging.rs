/* src/setup/logging.rs */

use std::str::FromStr;
use tracing_subscriber::filter::LevelFilter;

/// Installs the process-wide subscriber. `log` records from every module are
/// routed through it, filtered at `level` ("error" through "trace", or "off").
pub fn init(level: &str) -> Result<(), String> {
    let filter = LevelFilter::from_str(level)
        .map_err(|_| format!("Configuration error: unknown log_level '{}'.", level))?;
    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| format!("Failed to initialise logging: {}", e))
}
