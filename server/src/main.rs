mod game_service;
mod game_store;
mod server_config;
mod session_record;
mod web_server;

use std::path::PathBuf;

use clap::Parser;
use omok_common::{log, logger};

use game_store::{FileGameStore, MemoryGameStore};
use server_config::{StorageConfig, default_config_path, get_config_manager};
use web_server::run_web_server;

#[derive(Parser)]
#[command(name = "omok_server")]
struct Args {
    #[arg(long)]
    use_log_prefix: bool,

    /// Path to the YAML config file; defaults to one next to the executable.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Omok".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let config_path = args.config.unwrap_or_else(default_config_path);
    log!("Loading config from {}", config_path.display());
    let config = get_config_manager(&config_path).get_config()?;
    let addr = config.socket_addr()?;

    match config.storage {
        StorageConfig::Memory => {
            log!("Keeping games in memory");
            run_web_server(MemoryGameStore::new(), addr).await?;
        }
        StorageConfig::File { directory } => {
            log!("Keeping games in {}", directory);
            let store = FileGameStore::open(directory).await?;
            run_web_server(store, addr).await?;
        }
    }

    log!("Server shut down gracefully");

    Ok(())
}
