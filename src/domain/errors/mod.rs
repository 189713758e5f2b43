// Domain errors - Error types for the domain layer

use thiserror::Error;

/// Domain-specific error types
///
/// Tool failures carry the exit code of the child process (`None` when the
/// process could not be spawned or was killed by a signal) together with the
/// captured standard error stream.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Invalid arguments provided
    #[error("Bad arguments: {0}")]
    BadArgs(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A required external binary is missing
    #[error("External tool unavailable: {tool}")]
    ToolUnavailable { tool: String },

    /// ffprobe could not report a duration
    #[error("ffprobe failed (exit code {}): {stderr}", fmt_code(.exit_code))]
    ProbeFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    /// A slide segment could not be rendered
    #[error("ffmpeg failed (exit code {}): {stderr}", fmt_code(.exit_code))]
    RenderFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    /// The segment concatenation failed
    #[error("ffmpeg concat failed (exit code {}): {stderr}", fmt_code(.exit_code))]
    ConcatFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    /// Audio transcoding failed
    #[error("ffmpeg transcode failed (exit code {}): {stderr}", fmt_code(.exit_code))]
    TranscodeFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    /// PDF rasterization failed
    #[error("pdf rasterization failed (exit code {}): {stderr}", fmt_code(.exit_code))]
    RasterizeFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    /// PCM payload does not fit the 32-bit WAV size fields
    #[error("PCM payload of {0} bytes exceeds the WAV size limit")]
    WavPayloadTooLarge(usize),

    /// Format whose byte rate or block align overflows its header field
    #[error("PCM format {0} does not fit the WAV header fields")]
    WavFormatOverflow(String),

    /// Malformed WAV header
    #[error("Invalid WAV header: {0}")]
    InvalidWav(String),

    /// An external collaborator (mapper, synthesizer, lip-sync) failed
    #[error("{service} failed: {message}")]
    Collaborator { service: String, message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn fmt_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none".to_string(),
    }
}

impl DomainError {
    /// Exit code of the failed external tool, if this error came from one
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            DomainError::ProbeFailed { exit_code, .. }
            | DomainError::RenderFailed { exit_code, .. }
            | DomainError::ConcatFailed { exit_code, .. }
            | DomainError::TranscodeFailed { exit_code, .. }
            | DomainError::RasterizeFailed { exit_code, .. } => *exit_code,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_failure_display() {
        let err = DomainError::RenderFailed {
            exit_code: Some(1),
            stderr: "no such file".to_string(),
        };
        assert_eq!(err.to_string(), "ffmpeg failed (exit code 1): no such file");
        assert_eq!(err.exit_code(), Some(1));

        let err = DomainError::ConcatFailed {
            exit_code: None,
            stderr: "spawn".to_string(),
        };
        assert_eq!(err.to_string(), "ffmpeg concat failed (exit code none): spawn");
        assert_eq!(err.exit_code(), None);
    }

    #[test]
    fn test_non_tool_errors_have_no_exit_code() {
        assert_eq!(DomainError::BadArgs("x".into()).exit_code(), None);
    }
}
