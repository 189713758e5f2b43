// Assemble interactor - Orchestrates presentation video assembly

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Progress callback: `(slides rendered so far, total slides)`
pub type ProgressFn<'a> = &'a (dyn Fn(usize, usize) + Send + Sync);

/// Working directory owned by one assembly run.
///
/// A uniquely named sibling of the output, so a directory left behind by a
/// killed run never blocks the next one. Removed by [`WorkDir::close`] on the
/// normal path and by `TempDir`'s drop if the run is cancelled.
struct WorkDir {
    dir: TempDir,
}

impl WorkDir {
    async fn create(output_path: &Path) -> Result<Self, DomainError> {
        let (parent, prefix) = AssembleInteractor::work_dir_location(output_path);
        tokio::fs::create_dir_all(&parent).await?;
        let dir = tempfile::Builder::new().prefix(&prefix).tempdir_in(&parent)?;
        Ok(Self { dir })
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn segment_path(&self, index: usize) -> PathBuf {
        self.path().join(segment_file_name(index))
    }

    /// Remove the directory off the async workers; failures are only logged
    async fn close(self) {
        let path = self.path().to_path_buf();
        match tokio::task::spawn_blocking(move || self.dir.close()).await {
            Ok(Ok(())) => debug!(path = %path.display(), "Cleaned up working directory"),
            Ok(Err(e)) => {
                warn!(path = %path.display(), "Failed to remove working directory: {}", e)
            }
            Err(e) => warn!(path = %path.display(), "Working directory cleanup aborted: {}", e),
        }
    }
}

/// Interactor for the presentation assembly use case
pub struct AssembleInteractor {
    render_port: Arc<dyn SegmentRenderPort>,
    concat_port: Arc<dyn ConcatPort>,
}

impl AssembleInteractor {
    /// Create new assemble interactor with injected ports
    pub fn new(render_port: Arc<dyn SegmentRenderPort>, concat_port: Arc<dyn ConcatPort>) -> Self {
        Self {
            render_port,
            concat_port,
        }
    }

    /// Parent directory and name prefix of the working directory for
    /// `output_path`: a hidden sibling named after the output file
    pub fn work_dir_location(output_path: &Path) -> (PathBuf, String) {
        let parent = output_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let stem = output_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "presentation".to_string());
        (parent.to_path_buf(), format!(".{}.", stem))
    }

    /// Render every slide in order and concatenate the segments into
    /// `output_path`.
    ///
    /// Segments, manifest and working directory are removed on every exit
    /// path. On failure a partially written output is removed as well and
    /// the first error is returned unchanged.
    pub async fn assemble(
        &self,
        slides: &[SlideRenderInput],
        output_path: &Path,
        on_progress: Option<ProgressFn<'_>>,
    ) -> Result<AssemblyReport, DomainError> {
        Self::validate(slides)?;

        let work_dir = WorkDir::create(output_path).await?;
        info!(
            slides = slides.len(),
            output = %output_path.display(),
            work_dir = %work_dir.path().display(),
            "Starting presentation assembly"
        );

        let result = self
            .run(slides, output_path, &work_dir, on_progress)
            .await;
        work_dir.close().await;

        match result {
            Ok(segment_count) => {
                info!(output = %output_path.display(), segment_count, "Presentation assembled");
                Ok(AssemblyReport {
                    output_path: output_path.to_path_buf(),
                    segment_count,
                })
            }
            Err(Failure { error, output_touched }) => {
                if output_touched {
                    if let Err(e) = tokio::fs::remove_file(output_path).await {
                        if e.kind() != std::io::ErrorKind::NotFound {
                            warn!(path = %output_path.display(), "Failed to remove partial output: {}", e);
                        }
                    }
                }
                Err(error)
            }
        }
    }

    fn validate(slides: &[SlideRenderInput]) -> Result<(), DomainError> {
        if slides.is_empty() {
            return Err(DomainError::BadArgs("At least one slide is required".to_string()));
        }
        if slides.len() > MAX_SLIDES {
            return Err(DomainError::BadArgs(format!(
                "At most {} slides are supported, got {}",
                MAX_SLIDES,
                slides.len()
            )));
        }
        for (index, slide) in slides.iter().enumerate() {
            slide.validate().map_err(|e| {
                DomainError::BadArgs(format!("Slide {}: {}", index + 1, e))
            })?;
        }
        Ok(())
    }

    async fn run(
        &self,
        slides: &[SlideRenderInput],
        output_path: &Path,
        work_dir: &WorkDir,
        on_progress: Option<ProgressFn<'_>>,
    ) -> Result<usize, Failure> {
        let total = slides.len();
        let mut segments = Vec::with_capacity(total);

        for (index, slide) in slides.iter().enumerate() {
            let segment_path = work_dir.segment_path(index);
            self.render_port
                .render_segment(slide, &segment_path)
                .await
                .map_err(Failure::before_output)?;

            segments.push(segment_path);
            info!(slide = index + 1, total, "Rendered segment");
            if let Some(report) = on_progress {
                report(index + 1, total);
            }
        }

        self.concat_port
            .concatenate(&segments, output_path, work_dir.path())
            .await
            .map_err(Failure::after_output)?;

        Ok(segments.len())
    }
}

/// An assembly error plus whether the output file may have been written
struct Failure {
    error: DomainError,
    output_touched: bool,
}

impl Failure {
    fn before_output(error: DomainError) -> Self {
        Self {
            error,
            output_touched: false,
        }
    }

    fn after_output(error: DomainError) -> Self {
        Self {
            error,
            output_touched: true,
        }
    }
}
