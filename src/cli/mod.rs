/* src/cli/mod.rs */

mod download;
mod list;
mod shutdown;
mod upload;

use crate::cluster::Topology;
use crate::setup::check::validate_client_config;
use crate::setup::config::Config;
use log::debug;
use sha2::{Digest, Sha256};

pub const USAGE: &str = "Usage: client <node> upload <path> | download <filename> <output> | list | shutdown";

// args start at the node reference: ["6060", "download", "a.pdf", "out.pdf"]
pub async fn run(cfg: &Config, args: &[String]) -> Result<(), String> {
    validate_client_config(cfg)?;
    let topology = Topology::from_config(cfg)?;

    let (node, rest) = args.split_first().ok_or_else(|| USAGE.to_string())?;
    let addr = topology.resolve(node)?;
    let (command, params) = rest.split_first().ok_or_else(|| USAGE.to_string())?;
    debug!("Executing command: '{}' against {} with args: {:?}", command, addr, params);

    match (command.to_lowercase().as_str(), params) {
        ("upload", [path]) => upload::execute(&addr, path).await,
        ("download", [filename, output]) => download::execute(&addr, filename, output).await,
        ("list", []) => list::execute(&addr).await,
        ("shutdown", []) => shutdown::execute(&addr).await,
        _ => Err(format!("Invalid command. {}", USAGE)),
    }
}

pub fn digest(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
