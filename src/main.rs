//! slidecast
//!
//! A command-line tool that turns slide images plus narration audio into one
//! presentation video.
//!
//! # Usage
//!
//! ```bash
//! slidecast assemble --slide slide1.png=slide1.mp3 --slide slide2.png=slide2.mp3 --output talk.mp4
//! slidecast frame-wav --input speech.pcm --output speech.wav
//! slidecast check
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};

use slidecast::adapters::{LogFormat, TracingLogAdapter};
use slidecast::app::container::DefaultAppContainer;
use slidecast::cli::{commands, Cli, Commands};
use slidecast::config_initialization::initialize_configuration_hierarchy;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_format: LogFormat = cli.log_format.parse()?;
    TracingLogAdapter::init(&cli.log_level, log_format)?;
    debug!("Starting slidecast");

    let config = initialize_configuration_hierarchy(&cli)?;
    let container = DefaultAppContainer::new(config);

    match cli.command {
        Commands::Assemble(args) => {
            info!("Executing assemble command");
            commands::assemble(&container, args).await?;
        }
        Commands::FrameWav(args) => commands::frame_wav(&container, args).await?,
        Commands::EncodeMp3(args) => commands::encode_mp3(&container, args).await?,
        Commands::Probe(args) => commands::probe(&container, args).await?,
        Commands::Rasterize(args) => commands::rasterize(&container, args).await?,
        Commands::Split(args) => commands::split(args).await?,
        Commands::Analyze(args) => commands::analyze(&container, args).await?,
        Commands::Check => commands::check(&container).await?,
    }

    Ok(())
}
