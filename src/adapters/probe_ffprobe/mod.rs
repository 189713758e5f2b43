//! FFprobe adapter for audio duration probing

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::adapters::process::ToolCommand;
use crate::domain::errors::*;
use crate::ports::*;

/// FFprobe-based duration probe
pub struct FFprobeAdapter {
    binary: PathBuf,
    fallback_duration: f64,
}

impl FFprobeAdapter {
    /// Create new FFprobe adapter
    pub fn new(binary: impl Into<PathBuf>, fallback_duration: f64) -> Self {
        Self {
            binary: binary.into(),
            fallback_duration,
        }
    }

    /// Command that prints only the container duration in seconds
    pub fn duration_command(&self, audio_path: &Path) -> ToolCommand {
        ToolCommand::new(&self.binary)
            .args([
                "-v",
                "quiet",
                "-show_entries",
                "format=duration",
                "-of",
                "csv=p=0",
            ])
            .arg(audio_path)
    }

    /// Leading number of ffprobe's output, ignoring anything after it
    /// (extra lines, units); `None` when there is no finite number
    pub fn parse_duration(stdout: &str) -> Option<f64> {
        stdout
            .trim_start()
            .split(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')))
            .next()
            .and_then(|token| token.parse::<f64>().ok())
            .filter(|seconds| seconds.is_finite())
    }
}

#[async_trait]
impl DurationProbePort for FFprobeAdapter {
    async fn probe_duration(&self, audio_path: &Path) -> Result<f64, DomainError> {
        let output = self
            .duration_command(audio_path)
            .run()
            .await
            .map_err(|e| DomainError::ProbeFailed {
                exit_code: None,
                stderr: e.to_string(),
            })?;

        if !output.success() {
            return Err(DomainError::ProbeFailed {
                exit_code: output.exit_code(),
                stderr: output.stderr,
            });
        }

        match Self::parse_duration(&output.stdout) {
            Some(duration) => {
                debug!(path = %audio_path.display(), duration, "Probed audio duration");
                Ok(duration)
            }
            None => {
                warn!(
                    path = %audio_path.display(),
                    output = %output.stdout.trim(),
                    fallback = self.fallback_duration,
                    "Unparsable ffprobe duration, using fallback"
                );
                Ok(self.fallback_duration)
            }
        }
    }
}

#[async_trait]
impl ToolCheckPort for FFprobeAdapter {
    fn tool_name(&self) -> &str {
        "ffprobe"
    }

    async fn is_available(&self) -> bool {
        matches!(
            ToolCommand::new(&self.binary).arg("-version").run().await,
            Ok(output) if output.success()
        )
    }
}
