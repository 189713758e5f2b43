//! FFmpeg execution adapter
//!
//! Renders still-image segments, stream-copies them into one file and
//! transcodes narration audio, all by driving the `ffmpeg` binary.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::adapters::process::ToolCommand;
use crate::adapters::toml_config::RenderSettings;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Name of the concat manifest written into the working directory
pub const CONCAT_MANIFEST_NAME: &str = "concat_list.txt";

/// FFmpeg-based execution adapter
pub struct FFmpegAdapter {
    binary: PathBuf,
    render: RenderSettings,
    mp3_bitrate: String,
    probe: Arc<dyn DurationProbePort>,
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter
    pub fn new(
        binary: impl Into<PathBuf>,
        render: RenderSettings,
        probe: Arc<dyn DurationProbePort>,
    ) -> Self {
        Self {
            binary: binary.into(),
            render,
            mp3_bitrate: "128k".to_string(),
            probe,
        }
    }

    /// Override the narration MP3 bitrate
    pub fn with_mp3_bitrate(mut self, bitrate: impl Into<String>) -> Self {
        self.mp3_bitrate = bitrate.into();
        self
    }

    /// Loop the still image under the audio track, pinned to `duration`
    pub fn segment_command(
        &self,
        slide: &SlideRenderInput,
        duration: f64,
        output_path: &Path,
    ) -> ToolCommand {
        let render = &self.render;
        ToolCommand::new(&self.binary)
            .args(["-y", "-loop", "1", "-i"])
            .arg(&slide.image_path)
            .arg("-i")
            .arg(&slide.audio_path)
            .args(["-c:v", render.video_codec.as_str()])
            .args(tune_args(&render.tune))
            .args([
                "-c:a",
                render.audio_codec.as_str(),
                "-b:a",
                render.audio_bitrate.as_str(),
                "-pix_fmt",
                render.pixel_format.as_str(),
                "-shortest",
                "-t",
            ])
            .arg(duration.to_string())
            .arg(output_path)
    }

    /// Stream-copy every entry of `manifest` into `output_path`
    pub fn concat_command(&self, manifest: &Path, output_path: &Path) -> ToolCommand {
        ToolCommand::new(&self.binary)
            .args(["-y", "-f", "concat", "-safe", "0", "-i"])
            .arg(manifest)
            .args(["-c", "copy"])
            .arg(output_path)
    }

    /// Encode headerless PCM as MP3
    pub fn mp3_command(
        &self,
        pcm_path: &Path,
        mp3_path: &Path,
        format: PcmFormat,
    ) -> Result<ToolCommand, DomainError> {
        Ok(ToolCommand::new(&self.binary)
            .args(["-y", "-f", format.ffmpeg_sample_format()?])
            .args(["-ar".to_string(), format.sample_rate.to_string()])
            .args(["-ac".to_string(), format.channels.to_string()])
            .arg("-i")
            .arg(pcm_path)
            .args(["-acodec", "libmp3lame", "-b:a", self.mp3_bitrate.as_str()])
            .arg(mp3_path))
    }
}

fn tune_args(tune: &str) -> Vec<&str> {
    if tune.trim().is_empty() {
        Vec::new()
    } else {
        vec!["-tune", tune]
    }
}

/// Quote a path for the concat demuxer; embedded `'` becomes `'\''`
pub fn quote_manifest_path(path: &Path) -> String {
    format!("'{}'", path.to_string_lossy().replace('\'', r"'\''"))
}

/// Manifest body listing `segments` in the given order.
///
/// The demuxer resolves relative entries against the manifest's own
/// directory, so relative segment paths are made absolute first.
pub fn manifest_contents(segments: &[PathBuf]) -> std::io::Result<String> {
    let cwd = std::env::current_dir()?;
    let mut contents = String::new();
    for segment in segments {
        let absolute = if segment.is_absolute() {
            segment.clone()
        } else {
            cwd.join(segment)
        };
        contents.push_str("file ");
        contents.push_str(&quote_manifest_path(&absolute));
        contents.push('\n');
    }
    Ok(contents)
}

#[async_trait]
impl SegmentRenderPort for FFmpegAdapter {
    async fn render_segment(
        &self,
        slide: &SlideRenderInput,
        output_path: &Path,
    ) -> Result<(), DomainError> {
        let duration = match slide.duration {
            Some(duration) => duration,
            None => self.probe.probe_duration(&slide.audio_path).await?,
        };

        debug!(
            image = %slide.image_path.display(),
            audio = %slide.audio_path.display(),
            duration,
            "Rendering segment"
        );

        let output = self
            .segment_command(slide, duration, output_path)
            .run()
            .await
            .map_err(|e| DomainError::RenderFailed {
                exit_code: None,
                stderr: e.to_string(),
            })?;

        if !output.success() {
            return Err(DomainError::RenderFailed {
                exit_code: output.exit_code(),
                stderr: output.stderr,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ConcatPort for FFmpegAdapter {
    async fn concatenate(
        &self,
        segments: &[PathBuf],
        output_path: &Path,
        work_dir: &Path,
    ) -> Result<(), DomainError> {
        if segments.is_empty() {
            return Err(DomainError::BadArgs(
                "At least one segment is required for concatenation".to_string(),
            ));
        }

        let manifest = work_dir.join(CONCAT_MANIFEST_NAME);
        let contents = manifest_contents(segments)?;
        let result = match tokio::fs::write(&manifest, contents).await {
            Ok(()) => self.concat_command(&manifest, output_path).run().await,
            Err(e) => Err(e),
        };

        if let Err(e) = tokio::fs::remove_file(&manifest).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %manifest.display(), "Failed to remove concat manifest: {}", e);
            }
        }

        let output = result.map_err(|e| DomainError::ConcatFailed {
            exit_code: None,
            stderr: e.to_string(),
        })?;
        if !output.success() {
            return Err(DomainError::ConcatFailed {
                exit_code: output.exit_code(),
                stderr: output.stderr,
            });
        }

        info!(
            segments = segments.len(),
            output = %output_path.display(),
            "Concatenated segments"
        );
        Ok(())
    }
}

#[async_trait]
impl AudioTranscodePort for FFmpegAdapter {
    async fn pcm_to_mp3(
        &self,
        pcm_path: &Path,
        mp3_path: &Path,
        format: PcmFormat,
    ) -> Result<(), DomainError> {
        let output = self
            .mp3_command(pcm_path, mp3_path, format)?
            .run()
            .await
            .map_err(|e| DomainError::TranscodeFailed {
                exit_code: None,
                stderr: e.to_string(),
            })?;

        if !output.success() {
            return Err(DomainError::TranscodeFailed {
                exit_code: output.exit_code(),
                stderr: output.stderr,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ToolCheckPort for FFmpegAdapter {
    fn tool_name(&self) -> &str {
        "ffmpeg"
    }

    async fn is_available(&self) -> bool {
        matches!(
            ToolCommand::new(&self.binary).arg("-version").run().await,
            Ok(output) if output.success()
        )
    }
}
