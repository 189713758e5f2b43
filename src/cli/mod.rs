//! CLI module for slidecast
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// slidecast
///
/// Turns slide images plus narration audio into a single presentation video
/// by driving ffmpeg, and prepares the narration and slide images on the way.
#[derive(Parser, Debug)]
#[command(name = "slidecast")]
#[command(about = "slidecast - Narrated slide decks to video")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level
    #[arg(long, default_value = "info", global = true, env = "SLIDECAST_LOG_LEVEL")]
    pub log_level: String,

    /// Log output format (pretty, compact, json)
    #[arg(long, default_value = "pretty", global = true, env = "SLIDECAST_LOG_FORMAT")]
    pub log_format: String,

    /// Configuration file (defaults to ./slidecast.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render slides with narration into one video
    Assemble(args::AssembleArgs),
    /// Wrap raw PCM in a WAV header
    FrameWav(args::PcmArgs),
    /// Encode raw PCM as MP3
    EncodeMp3(args::PcmArgs),
    /// Print the duration of an audio file
    Probe(args::ProbeArgs),
    /// Render PDF pages into PNG images
    Rasterize(args::RasterizeArgs),
    /// Split a manuscript into per-slide scripts
    Split(args::SplitArgs),
    /// Map a PDF deck and/or manuscript onto slide scenes
    Analyze(args::AnalyzeArgs),
    /// Report which external tools are available
    Check,
}
