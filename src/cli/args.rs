//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the assemble command
#[derive(Args, Debug)]
pub struct AssembleArgs {
    /// JSON plan: {"slides": [{"image_path": ..., "audio_path": ..., "duration": ...}]}
    #[arg(long, conflicts_with = "slides")]
    pub plan: Option<PathBuf>,

    /// Slide as IMAGE=AUDIO, repeat in presentation order
    #[arg(long = "slide", value_name = "IMAGE=AUDIO")]
    pub slides: Vec<String>,

    /// Output video path
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Arguments shared by the PCM commands
#[derive(Args, Debug)]
pub struct PcmArgs {
    /// Raw PCM input file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Sample rate in Hz
    #[arg(long)]
    pub sample_rate: Option<u32>,

    /// Interleaved channel count
    #[arg(long)]
    pub channels: Option<u16>,

    /// Bits per sample
    #[arg(long)]
    pub bits: Option<u16>,
}

/// Arguments for the probe command
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Audio file to measure
    #[arg(long)]
    pub audio: PathBuf,
}

/// Arguments for the rasterize command
#[derive(Args, Debug)]
pub struct RasterizeArgs {
    /// PDF document
    #[arg(long)]
    pub pdf: PathBuf,

    /// Directory receiving the page images
    #[arg(long)]
    pub out_dir: PathBuf,

    /// Render resolution
    #[arg(long)]
    pub dpi: Option<u32>,
}

/// Arguments for the split command
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Manuscript text file
    #[arg(long)]
    pub manuscript: PathBuf,

    /// Number of slides (estimated from the manuscript when omitted)
    #[arg(long)]
    pub slides: Option<usize>,
}

/// Arguments for the analyze command
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// PDF deck
    #[arg(long)]
    pub pdf: Option<PathBuf>,

    /// Manuscript text file
    #[arg(long)]
    pub manuscript: Option<PathBuf>,

    /// Project directory receiving rasterized images
    #[arg(long, default_value = ".")]
    pub project_dir: PathBuf,
}
