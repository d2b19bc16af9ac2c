use std::path::PathBuf;

use clap::Parser;
use dropwatch::app::App;
use dropwatch::config::Config;
use tokio::signal;
use tracing::{error, info};

/// Wildberries price-drop and restock tracking Telegram bot.
#[derive(Debug, Parser)]
#[command(name = "dropwatch", version, about)]
struct Args {
    /// Path to the configuration file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let config = match Config::load_or_default(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    config.init_logging();
    info!("dropwatch starting");

    tokio::select! {
        result = App::run(config) => {
            if let Err(e) = result {
                error!(error = %e, "Fatal error");
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("dropwatch stopped");
}
