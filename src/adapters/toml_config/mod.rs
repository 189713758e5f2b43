// TOML config adapter - Configuration management using TOML files

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::errors::*;
use crate::domain::model::PcmFormat;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "slidecast.toml";

/// Complete runtime configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlidecastConfig {
    pub tools: ToolPaths,
    pub render: RenderSettings,
    pub audio: AudioSettings,
    pub pdf: PdfSettings,
}

/// Locations of the external binaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
    pub pdftoppm: PathBuf,
    pub pdfinfo: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
            pdftoppm: PathBuf::from("pdftoppm"),
            pdfinfo: PathBuf::from("pdfinfo"),
        }
    }
}

/// Encode settings shared by every segment so that stream-copy concat works
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub video_codec: String,
    pub tune: String,
    pub audio_codec: String,
    pub audio_bitrate: String,
    pub pixel_format: String,
    /// Used when ffprobe output cannot be parsed
    pub fallback_duration_secs: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            tune: "stillimage".to_string(),
            audio_codec: "aac".to_string(),
            audio_bitrate: "192k".to_string(),
            pixel_format: "yuv420p".to_string(),
            fallback_duration_secs: 5.0,
        }
    }
}

/// Raw audio format and narration encode settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub mp3_bitrate: String,
}

impl Default for AudioSettings {
    fn default() -> Self {
        let format = PcmFormat::default();
        Self {
            sample_rate: format.sample_rate,
            channels: format.channels,
            bits_per_sample: format.bits_per_sample,
            mp3_bitrate: "128k".to_string(),
        }
    }
}

impl AudioSettings {
    pub fn pcm_format(&self) -> PcmFormat {
        PcmFormat::new(self.sample_rate, self.channels, self.bits_per_sample)
    }
}

/// PDF rasterization settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfSettings {
    pub dpi: u32,
    /// Bytes per page assumed when estimating a page count without poppler
    pub estimate_bytes_per_page: u64,
}

impl Default for PdfSettings {
    fn default() -> Self {
        Self {
            dpi: 150,
            estimate_bytes_per_page: 50_000,
        }
    }
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse configuration from a TOML document
    pub fn from_toml_str(content: &str) -> Result<SlidecastConfig, DomainError> {
        toml::from_str(content)
            .map_err(|e| DomainError::Config(format!("Failed to parse TOML config: {}", e)))
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<SlidecastConfig, DomainError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Serialize configuration back to TOML
    pub fn to_toml_string(config: &SlidecastConfig) -> Result<String, DomainError> {
        toml::to_string_pretty(config)
            .map_err(|e| DomainError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Apply `SLIDECAST_*` overrides using the given variable lookup
    pub fn apply_env_overrides<F>(config: &mut SlidecastConfig, lookup: F) -> Result<usize, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = 0;

        let paths: [(&str, &mut PathBuf); 4] = [
            ("SLIDECAST_FFMPEG", &mut config.tools.ffmpeg),
            ("SLIDECAST_FFPROBE", &mut config.tools.ffprobe),
            ("SLIDECAST_PDFTOPPM", &mut config.tools.pdftoppm),
            ("SLIDECAST_PDFINFO", &mut config.tools.pdfinfo),
        ];
        for (var, slot) in paths {
            if let Some(value) = lookup(var) {
                debug!("Environment override: {} = {}", var, value);
                *slot = PathBuf::from(value);
                applied += 1;
            }
        }

        if let Some(value) = lookup("SLIDECAST_FALLBACK_DURATION") {
            config.render.fallback_duration_secs = value.trim().parse().map_err(|e| {
                DomainError::Config(format!("Invalid SLIDECAST_FALLBACK_DURATION: {}", e))
            })?;
            applied += 1;
        }

        if let Some(value) = lookup("SLIDECAST_PDF_DPI") {
            config.pdf.dpi = value
                .trim()
                .parse()
                .map_err(|e| DomainError::Config(format!("Invalid SLIDECAST_PDF_DPI: {}", e)))?;
            applied += 1;
        }

        Ok(applied)
    }

    /// Validate configuration
    pub fn validate(config: &SlidecastConfig) -> Result<(), DomainError> {
        config
            .audio
            .pcm_format()
            .validate()
            .map_err(|e| DomainError::Config(e.to_string()))?;

        let fallback = config.render.fallback_duration_secs;
        if !fallback.is_finite() || fallback <= 0.0 {
            return Err(DomainError::Config(format!(
                "fallback_duration_secs must be positive, got {}",
                fallback
            )));
        }

        if config.pdf.dpi == 0 {
            return Err(DomainError::Config("pdf.dpi must be non-zero".to_string()));
        }

        let render = &config.render;
        for (key, value) in [
            ("render.video_codec", &render.video_codec),
            ("render.audio_codec", &render.audio_codec),
            ("render.audio_bitrate", &render.audio_bitrate),
            ("render.pixel_format", &render.pixel_format),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::Config(format!("{} must not be empty", key)));
            }
        }

        Ok(())
    }
}
