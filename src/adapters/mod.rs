// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod probe_ffprobe;
pub mod process;
pub mod rasterize_poppler;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use exec_ffmpeg::FFmpegAdapter;
pub use probe_ffprobe::FFprobeAdapter;
pub use rasterize_poppler::PopplerAdapter;
pub use toml_config::{SlidecastConfig, TomlConfigAdapter};
pub use tracing_log::{LogFormat, TracingLogAdapter};
