//! slidecast library
//!
//! Assembles narrated slide decks into a single video by orchestrating the
//! external ffmpeg/ffprobe binaries, and prepares the inputs on the way:
//! WAV framing and MP3 encoding of synthesized speech, PDF rasterization and
//! manuscript splitting.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use app::{AnalyzeInteractor, AssembleInteractor, NarrateInteractor};
pub use domain::errors::DomainError;
pub use domain::model::{AssemblyPlan, AssemblyReport, PcmFormat, SlideRenderInput};
