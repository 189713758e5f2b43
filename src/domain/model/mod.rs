// Domain models - Core types and data structures

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Width of the zero-padded index in segment file names.
pub const SEGMENT_INDEX_WIDTH: usize = 3;

/// Number of slides that can be named before lexical ordering breaks.
pub const MAX_SLIDES: usize = 1000;

/// One slide handed to the assembler: a still image plus its narration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideRenderInput {
    pub image_path: PathBuf,
    pub audio_path: PathBuf,
    /// Overrides the probed audio duration, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl SlideRenderInput {
    /// Create a slide whose duration is taken from the audio
    pub fn new(image_path: impl Into<PathBuf>, audio_path: impl Into<PathBuf>) -> Self {
        Self {
            image_path: image_path.into(),
            audio_path: audio_path.into(),
            duration: None,
        }
    }

    /// Pin the segment to an explicit duration
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Parse the `IMAGE=AUDIO` form used on the command line
    pub fn parse_pair(pair: &str) -> Result<Self, DomainError> {
        let (image, audio) = pair.split_once('=').ok_or_else(|| {
            DomainError::BadArgs(format!("Expected IMAGE=AUDIO, got '{}'", pair))
        })?;
        if image.trim().is_empty() || audio.trim().is_empty() {
            return Err(DomainError::BadArgs(format!(
                "Both image and audio paths are required in '{}'",
                pair
            )));
        }
        Ok(Self::new(image.trim(), audio.trim()))
    }

    /// Validate a duration override, if present
    pub fn validate(&self) -> Result<(), DomainError> {
        match self.duration {
            Some(d) if !d.is_finite() || d <= 0.0 => Err(DomainError::BadArgs(format!(
                "Slide duration must be a positive number of seconds, got {}",
                d
            ))),
            _ => Ok(()),
        }
    }
}

/// A slide plan as read from a JSON file: `{"slides": [...]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssemblyPlan {
    pub slides: Vec<SlideRenderInput>,
}

impl AssemblyPlan {
    /// Load a plan from a JSON document
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        serde_json::from_str(json)
            .map_err(|e| DomainError::BadArgs(format!("Invalid assembly plan: {}", e)))
    }
}

/// File name of the segment rendered for the slide at `index` (0-based)
pub fn segment_file_name(index: usize) -> String {
    format!("segment_{:0width$}.mp4", index, width = SEGMENT_INDEX_WIDTH)
}

/// Out-of-band format of a raw PCM buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PcmFormat {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl Default for PcmFormat {
    /// Native output format of the speech model: 24 kHz mono 16-bit
    fn default() -> Self {
        Self {
            sample_rate: 24_000,
            channels: 1,
            bits_per_sample: 16,
        }
    }
}

impl PcmFormat {
    pub fn new(sample_rate: u32, channels: u16, bits_per_sample: u16) -> Self {
        Self {
            sample_rate,
            channels,
            bits_per_sample,
        }
    }

    /// Bytes per interleaved sample frame, as stored in the 16-bit header field
    pub fn block_align(&self) -> Result<u16, DomainError> {
        let value = self.channels as u64 * self.bits_per_sample as u64 / 8;
        u16::try_from(value).map_err(|_| DomainError::WavFormatOverflow(self.to_string()))
    }

    /// Bytes per second of audio, as stored in the 32-bit header field
    pub fn byte_rate(&self) -> Result<u32, DomainError> {
        (self.sample_rate as u64)
            .checked_mul(self.channels as u64)
            .and_then(|v| v.checked_mul(self.bits_per_sample as u64))
            .map(|v| v / 8)
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| DomainError::WavFormatOverflow(self.to_string()))
    }

    /// Playable duration of `data_len` bytes in this format
    pub fn duration_secs(&self, data_len: usize) -> f64 {
        let rate =
            self.sample_rate as f64 * self.channels as f64 * self.bits_per_sample as f64 / 8.0;
        if rate == 0.0 {
            return 0.0;
        }
        data_len as f64 / rate
    }

    /// ffmpeg raw sample format name for this bit depth
    pub fn ffmpeg_sample_format(&self) -> Result<&'static str, DomainError> {
        match self.bits_per_sample {
            8 => Ok("u8"),
            16 => Ok("s16le"),
            24 => Ok("s24le"),
            32 => Ok("s32le"),
            other => Err(DomainError::BadArgs(format!(
                "Unsupported PCM bit depth: {}",
                other
            ))),
        }
    }

    /// Reject formats that cannot describe real audio
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.sample_rate == 0 {
            return Err(DomainError::BadArgs("Sample rate must be non-zero".into()));
        }
        if self.channels == 0 {
            return Err(DomainError::BadArgs("Channel count must be non-zero".into()));
        }
        if self.bits_per_sample == 0 || self.bits_per_sample % 8 != 0 {
            return Err(DomainError::BadArgs(format!(
                "Bits per sample must be a non-zero multiple of 8, got {}",
                self.bits_per_sample
            )));
        }
        self.block_align()?;
        self.byte_rate()?;
        Ok(())
    }
}

impl fmt::Display for PcmFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Hz, {} ch, {}-bit",
            self.sample_rate, self.channels, self.bits_per_sample
        )
    }
}

/// Per-slide narration text as produced by a script mapper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideScript {
    pub slide_number: usize,
    pub script: String,
}

/// One analyzed slide: its script and the rasterized page, if any
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub slide_number: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<PathBuf>,
    pub script: String,
}

/// Result of analyzing a deck and/or manuscript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckAnalysis {
    pub slide_count: usize,
    pub scenes: Vec<Scene>,
}

/// Intonation hint passed to the speech synthesizer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intonation {
    Weak,
    #[default]
    Normal,
    Strong,
}

/// Options forwarded to the speech synthesizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechOptions {
    pub speed: f32,
    pub intonation: Intonation,
    pub acting_instruction: Option<String>,
    pub voice_name: String,
}

impl Default for SpeechOptions {
    fn default() -> Self {
        Self {
            speed: 1.0,
            intonation: Intonation::Normal,
            acting_instruction: None,
            voice_name: "Aoede".to_string(),
        }
    }
}

/// Files written for one narrated slide
#[derive(Debug, Clone, PartialEq)]
pub struct NarrationOutput {
    pub wav_path: PathBuf,
    pub mp3_path: PathBuf,
    /// Lip-synced avatar clip; `None` when no lip-sync service is configured
    pub avatar_video_path: Option<PathBuf>,
    pub duration_secs: f64,
}

/// Summary of a finished assembly run
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyReport {
    pub output_path: PathBuf,
    pub segment_count: usize,
}
