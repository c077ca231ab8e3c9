/* src/lib.rs */

pub mod cli;
pub mod client;
pub mod cluster;
pub mod launch;
pub mod node;
pub mod setup;
pub mod store;
pub mod wire;
