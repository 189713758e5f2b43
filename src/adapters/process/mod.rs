//! Scoped invocation of external tools.
//!
//! Every call to ffmpeg, ffprobe or poppler goes through [`ToolCommand::run`],
//! which owns the child for the duration of the call: stdio is captured to
//! completion and the child is killed if the awaiting future is dropped.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::ports::ToolCheckPort;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// A fully described tool invocation
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

/// Captured result of a finished tool invocation
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Exit code, or `None` when the child was terminated by a signal
    pub fn exit_code(&self) -> Option<i32> {
        self.status.code()
    }
}

impl ToolCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments as lossy strings, for logging and assertions
    pub fn arg_strings(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// Spawn the tool and wait for it to exit.
    ///
    /// An `Err` means the process could not be started at all (for example
    /// the binary is missing); a non-zero exit is reported in the output.
    pub async fn run(&self) -> std::io::Result<ToolOutput> {
        debug!(
            program = %self.program.display(),
            args = ?self.arg_strings(),
            "Spawning external tool"
        );

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(windows)]
        command.creation_flags(CREATE_NO_WINDOW);

        let output = command.output().await?;

        let output = ToolOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(
            program = %self.program.display(),
            exit_code = ?output.exit_code(),
            "External tool finished"
        );
        Ok(output)
    }
}

/// Availability check for a binary that answers a version flag with exit 0
pub struct BinaryCheck {
    name: String,
    command: ToolCommand,
}

impl BinaryCheck {
    pub fn new(name: impl Into<String>, binary: impl Into<PathBuf>, version_flag: &str) -> Self {
        Self {
            name: name.into(),
            command: ToolCommand::new(binary).arg(version_flag),
        }
    }
}

#[async_trait]
impl ToolCheckPort for BinaryCheck {
    fn tool_name(&self) -> &str {
        &self.name
    }

    async fn is_available(&self) -> bool {
        matches!(self.command.run().await, Ok(output) if output.success())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_captures_streams_and_exit_code() {
        let output = ToolCommand::new("sh")
            .args(["-c", "echo out; echo err >&2; exit 3"])
            .run()
            .await
            .unwrap();

        assert!(!output.success());
        assert_eq!(output.exit_code(), Some(3));
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
    }

    #[tokio::test]
    async fn test_run_reports_spawn_error_for_missing_binary() {
        let err = ToolCommand::new("/nonexistent/slidecast-tool")
            .arg("-version")
            .run()
            .await
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_binary_check() {
        assert_eq!(BinaryCheck::new("pdfinfo", "true", "-v").tool_name(), "pdfinfo");
        assert!(BinaryCheck::new("true", "true", "-v").is_available().await);
        assert!(!BinaryCheck::new("false", "false", "-v").is_available().await);
        assert!(!BinaryCheck::new("pdfinfo", "/nonexistent/pdfinfo", "-v").is_available().await);
    }

    #[test]
    fn test_arg_strings() {
        let command = ToolCommand::new("ffmpeg").arg("-y").args(["-i", "in.mp4"]);
        assert_eq!(command.program(), Path::new("ffmpeg"));
        assert_eq!(command.arg_strings(), vec!["-y", "-i", "in.mp4"]);
    }
}
