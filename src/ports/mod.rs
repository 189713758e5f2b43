// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for reading the playable duration of an audio file
#[async_trait]
pub trait DurationProbePort: Send + Sync {
    /// Duration in seconds.
    ///
    /// Unparsable tool output is not an error: implementations substitute a
    /// fallback duration. Only a failed tool invocation is reported.
    async fn probe_duration(&self, audio_path: &Path) -> Result<f64, DomainError>;
}

/// Port for turning one still image plus narration into a video segment
#[async_trait]
pub trait SegmentRenderPort: Send + Sync {
    /// Render `slide` into exactly one file at `output_path`
    async fn render_segment(
        &self,
        slide: &SlideRenderInput,
        output_path: &Path,
    ) -> Result<(), DomainError>;
}

/// Port for joining same-codec segments without re-encoding
#[async_trait]
pub trait ConcatPort: Send + Sync {
    /// Concatenate `segments` in order into `output_path`, writing any
    /// manifest into `work_dir` and removing it before returning
    async fn concatenate(
        &self,
        segments: &[PathBuf],
        output_path: &Path,
        work_dir: &Path,
    ) -> Result<(), DomainError>;
}

/// Port for checking that an external binary can be run
#[async_trait]
pub trait ToolCheckPort: Send + Sync {
    /// Name shown in diagnostics
    fn tool_name(&self) -> &str;

    /// True only when the tool ran and exited successfully; never errors
    async fn is_available(&self) -> bool;
}

/// Port for converting raw PCM into a compressed, browser-friendly format
#[async_trait]
pub trait AudioTranscodePort: Send + Sync {
    async fn pcm_to_mp3(
        &self,
        pcm_path: &Path,
        mp3_path: &Path,
        format: PcmFormat,
    ) -> Result<(), DomainError>;
}

/// Port for turning PDF pages into images
#[async_trait]
pub trait PdfRasterizerPort: Send + Sync {
    /// Whether the rasterizer binaries are installed
    async fn is_available(&self) -> bool;

    /// Number of pages in the document
    async fn page_count(&self, pdf_path: &Path) -> Result<usize, DomainError>;

    /// Render every page into `out_dir`, returning image paths in page order
    async fn rasterize(
        &self,
        pdf_path: &Path,
        out_dir: &Path,
        dpi: u32,
    ) -> Result<Vec<PathBuf>, DomainError>;
}

/// Port for the third-party text model that maps a manuscript onto slides
#[async_trait]
pub trait ScriptMapperPort: Send + Sync {
    async fn map(
        &self,
        manuscript: &str,
        slide_count: usize,
    ) -> Result<Vec<SlideScript>, DomainError>;
}

/// Port for the third-party speech model
#[async_trait]
pub trait SpeechSynthesisPort: Send + Sync {
    /// Raw PCM in the model's native format
    async fn synthesize(&self, text: &str, options: &SpeechOptions)
        -> Result<Vec<u8>, DomainError>;
}

/// Port for the remote lip-sync avatar service
#[async_trait]
pub trait LipsyncPort: Send + Sync {
    /// Encoded video of the avatar speaking `audio`
    async fn generate(&self, image: &[u8], audio: &[u8]) -> Result<Vec<u8>, DomainError>;
}
