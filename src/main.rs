//! FrameX CLI
//!
//! Samples frames from a video file through ffmpeg.
//!
//! # Usage
//!
//! ```bash
//! framex extract --input talk.mp4 --fps 1 --scale 0.5 --output-dir frames/
//! framex extract --input talk.mp4 --start 00:01:00 --end 00:02:00 --max-frames 10 --json
//! framex probe --input talk.mp4 --format json
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use framex::app::DefaultAppContainer;
use framex::cli::{commands, Cli, Commands};
use framex::config_initialization::initialize_configuration_hierarchy;
use framex::utils::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = initialize_configuration_hierarchy(&cli)?;
    init_logging(&settings.logging)?;
    info!("Starting FrameX {}", env!("CARGO_PKG_VERSION"));

    let container = DefaultAppContainer::new(&settings);

    match cli.command {
        Commands::Extract(args) => {
            info!("Executing extract command");
            commands::extract(&container, &settings, args).await?;
        }
        Commands::Probe(args) => {
            info!("Executing probe command");
            commands::probe(&container, args).await?;
        }
    }

    Ok(())
}
