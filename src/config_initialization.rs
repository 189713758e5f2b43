//! Configuration initialization and hierarchy management

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::adapters::toml_config::DEFAULT_CONFIG_FILE;
use crate::adapters::{SlidecastConfig, TomlConfigAdapter};
use crate::cli::{Cli, Commands};

/// Build the effective configuration following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &Cli) -> Result<SlidecastConfig> {
    let mut config = match config_file_path(cli.config.as_deref()) {
        Some(path) => TomlConfigAdapter::load(&path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => {
            debug!("No configuration file found, using defaults");
            SlidecastConfig::default()
        }
    };

    let env_overrides =
        TomlConfigAdapter::apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;
    if env_overrides > 0 {
        info!("Applied {} environment variable overrides", env_overrides);
    }

    let cli_overrides = apply_cli_configuration_overrides(&mut config, &cli.command);
    if cli_overrides > 0 {
        info!("Applied {} CLI configuration overrides", cli_overrides);
    }

    TomlConfigAdapter::validate(&config)?;
    Ok(config)
}

/// An explicit `--config` always wins; otherwise the default file is used
/// only when it exists
fn config_file_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.exists().then_some(default)
        }
    }
}

/// Apply per-command flags on top of the configuration
fn apply_cli_configuration_overrides(config: &mut SlidecastConfig, command: &Commands) -> usize {
    let mut overrides = 0;

    match command {
        Commands::FrameWav(args) | Commands::EncodeMp3(args) => {
            if let Some(rate) = args.sample_rate {
                config.audio.sample_rate = rate;
                overrides += 1;
            }
            if let Some(channels) = args.channels {
                config.audio.channels = channels;
                overrides += 1;
            }
            if let Some(bits) = args.bits {
                config.audio.bits_per_sample = bits;
                overrides += 1;
            }
        }
        Commands::Rasterize(args) => {
            if let Some(dpi) = args.dpi {
                config.pdf.dpi = dpi;
                overrides += 1;
            }
        }
        _ => {}
    }

    overrides
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_overrides_audio_format() {
        let cli = Cli::parse_from([
            "slidecast",
            "frame-wav",
            "--input",
            "in.pcm",
            "--output",
            "out.wav",
            "--sample-rate",
            "44100",
            "--channels",
            "2",
        ]);
        let mut config = SlidecastConfig::default();
        assert_eq!(apply_cli_configuration_overrides(&mut config, &cli.command), 2);
        assert_eq!(config.audio.sample_rate, 44_100);
        assert_eq!(config.audio.channels, 2);
        assert_eq!(config.audio.bits_per_sample, 16);
    }

    #[test]
    fn test_cli_overrides_dpi() {
        let cli = Cli::parse_from([
            "slidecast", "rasterize", "--pdf", "d.pdf", "--out-dir", "img", "--dpi", "300",
        ]);
        let mut config = SlidecastConfig::default();
        apply_cli_configuration_overrides(&mut config, &cli.command);
        assert_eq!(config.pdf.dpi, 300);
    }

    #[test]
    fn test_explicit_config_path_wins() {
        assert_eq!(
            config_file_path(Some(Path::new("custom.toml"))),
            Some(PathBuf::from("custom.toml"))
        );
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let cli = Cli::parse_from(["slidecast", "--config", "/nonexistent/slidecast.toml", "check"]);
        assert!(initialize_configuration_hierarchy(&cli).is_err());
    }
}
