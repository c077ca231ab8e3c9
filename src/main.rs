/* src/main.rs */

use chunkr::setup::config::Config;
use chunkr::setup::gen_conf::generate_default_config;
use chunkr::setup::logging;
use chunkr::{cli, launch, node};
use std::env;
use std::process;

const DEFAULT_CONFIG: &str = "chunkr.toml";
const USAGE: &str = "Use '-c <config_path> node <port>', '-c <config_path> client <node> <command> ...', \
'-c <config_path> launch', or no arguments to generate a default config.";

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() == 1 {
        if let Err(e) = generate_default_config(DEFAULT_CONFIG) {
            eprintln!("! Failed to write {}: {}", DEFAULT_CONFIG, e);
            process::exit(1);
        }
        println!("> Default config generated. Use '-c {}' to run.", DEFAULT_CONFIG);
        return;
    }

    if let Err(e) = run(&args[1..]).await {
        eprintln!("{}", e);
        process::exit(1);
    }
}

async fn run(args: &[String]) -> Result<(), String> {
    let [flag, config_path, mode, rest @ ..] = args else {
        return Err(format!("! Invalid usage. {}", USAGE));
    };
    if flag != "-c" {
        return Err(format!("! Invalid usage. {}", USAGE));
    }

    let config = Config::from_file(config_path)?;
    logging::init(&config.setup.log_level)?;

    match (mode.as_str(), rest) {
        ("node", [port]) => {
            let port = port
                .parse::<u16>()
                .map_err(|_| format!("! '{}' is not a valid port.", port))?;
            node::bootstrap::start_node(config, port).await
        }
        ("client", rest) => cli::run(&config, rest).await,
        ("launch", []) => launch::run(&config, config_path).await,
        _ => Err(format!("! Invalid usage. {}", USAGE)),
    }
}
