/* src/setup/gen_conf.rs */

use pnet::datalink;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

pub const DEFAULT_PORTS: [u16; 4] = [6060, 6061, 6062, 6063];
pub const DEFAULT_CHUNK_SIZE: usize = 128 * 1024;

// Scans for available IPv4 addresses and prompts the user to select one.
fn select_ip_address() -> io::Result<String> {
    // Get all non-loopback IPv4 addresses from all network interfaces.
    let ipv4_addrs: Vec<String> = datalink::interfaces()
        .into_iter()
        .flat_map(|iface| iface.ips)
        .filter(|ip| ip.is_ipv4() && !ip.ip().is_loopback())
        .map(|ip| ip.ip().to_string())
        .collect();

    match ipv4_addrs.as_slice() {
        [] => {
            println!("> No network interfaces with a valid IPv4 address found. Falling back to 127.0.0.1.");
            Ok("127.0.0.1".to_string())
        }
        [ip] => {
            println!("> Found a single IPv4 address: {}. Using it.", ip);
            Ok(ip.clone())
        }
        _ => {
            println!("> Multiple IPv4 addresses found. Please choose one:");
            for (i, ip) in ipv4_addrs.iter().enumerate() {
                println!("  {}) {}", i + 1, ip);
            }

            // Loop until a valid selection is made.
            loop {
                print!("> Enter the number of the IP address to use: ");
                io::stdout().flush()?;

                let mut input = String::new();
                if io::stdin().read_line(&mut input)? == 0 {
                    println!("\n> No selection made. Falling back to 127.0.0.1.");
                    return Ok("127.0.0.1".to_string());
                }

                match input.trim().parse::<usize>() {
                    Ok(n) if n > 0 && n <= ipv4_addrs.len() => {
                        let selected_ip = ipv4_addrs[n - 1].clone();
                        println!("> You selected: {}", selected_ip);
                        return Ok(selected_ip);
                    }
                    _ => {
                        println!(
                            "! Invalid selection. Please enter a number between 1 and {}.",
                            ipv4_addrs.len()
                        );
                    }
                }
            }
        }
    }
}

pub fn render_default_config(address: &str) -> String {
    let nodes = DEFAULT_PORTS
        .iter()
        .map(|port| format!("\"{}:{}\"", address, port))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        r#"[setup]
log_level = "info"
storage_root = "storage"

[network]
listen = "0.0.0.0"
peer_timeout_ms = 2000

[cluster]
chunk_size = {}
replica = 2
nodes = [{}]
"#,
        DEFAULT_CHUNK_SIZE, nodes
    )
}

// Generates a default configuration file after prompting the user to select an IP address.
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> io::Result<()> {
    let selected_ip = select_ip_address()?;
    let content = render_default_config(&selected_ip);

    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    println!("+ Default configuration file created successfully.");
    Ok(())
}
