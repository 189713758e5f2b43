use std::sync::Arc;

use crate::adapters::process::BinaryCheck;
use crate::adapters::{FFmpegAdapter, FFprobeAdapter, PopplerAdapter, SlidecastConfig};
use crate::app::{AnalyzeInteractor, AssembleInteractor, NarrateInteractor};
use crate::ports::{
    AudioTranscodePort, ConcatPort, DurationProbePort, PdfRasterizerPort, SegmentRenderPort,
    SpeechSynthesisPort, ToolCheckPort,
};

pub trait AppContainer: Send + Sync {
    fn assemble_interactor(&self) -> Arc<AssembleInteractor>;
    fn analyze_interactor(&self) -> Arc<AnalyzeInteractor>;
    fn probe_port(&self) -> Arc<dyn DurationProbePort>;
    fn transcode_port(&self) -> Arc<dyn AudioTranscodePort>;
    fn rasterizer_port(&self) -> Arc<dyn PdfRasterizerPort>;
    fn ffmpeg_check(&self) -> Arc<dyn ToolCheckPort>;
    fn tool_checks(&self) -> Vec<Arc<dyn ToolCheckPort>>;
}

/// Wires the process adapters into the interactors from one configuration
pub struct DefaultAppContainer {
    config: SlidecastConfig,
    ffmpeg: Arc<FFmpegAdapter>,
    ffprobe: Arc<FFprobeAdapter>,
    poppler: Arc<PopplerAdapter>,
    assemble_interactor: Arc<AssembleInteractor>,
    analyze_interactor: Arc<AnalyzeInteractor>,
}

impl DefaultAppContainer {
    pub fn new(config: SlidecastConfig) -> Self {
        let ffprobe = Arc::new(FFprobeAdapter::new(
            &config.tools.ffprobe,
            config.render.fallback_duration_secs,
        ));
        let ffmpeg = Arc::new(
            FFmpegAdapter::new(
                &config.tools.ffmpeg,
                config.render.clone(),
                Arc::clone(&ffprobe) as Arc<dyn DurationProbePort>,
            )
            .with_mp3_bitrate(config.audio.mp3_bitrate.clone()),
        );
        let poppler = Arc::new(PopplerAdapter::new(&config.tools.pdftoppm, &config.tools.pdfinfo));

        let assemble_interactor = Arc::new(AssembleInteractor::new(
            Arc::clone(&ffmpeg) as Arc<dyn SegmentRenderPort>,
            Arc::clone(&ffmpeg) as Arc<dyn ConcatPort>,
        ));
        let analyze_interactor = Arc::new(AnalyzeInteractor::new(
            Arc::clone(&poppler) as Arc<dyn PdfRasterizerPort>,
            config.pdf.clone(),
        ));

        Self {
            config,
            ffmpeg,
            ffprobe,
            poppler,
            assemble_interactor,
            analyze_interactor,
        }
    }

    pub fn config(&self) -> &SlidecastConfig {
        &self.config
    }

    /// Narration needs a speech model, which has no built-in adapter
    pub fn narrate_interactor(&self, synthesizer: Arc<dyn SpeechSynthesisPort>) -> NarrateInteractor {
        NarrateInteractor::new(
            synthesizer,
            Arc::clone(&self.ffmpeg) as Arc<dyn AudioTranscodePort>,
            self.config.audio.pcm_format(),
        )
    }
}

impl AppContainer for DefaultAppContainer {
    fn assemble_interactor(&self) -> Arc<AssembleInteractor> {
        Arc::clone(&self.assemble_interactor)
    }

    fn analyze_interactor(&self) -> Arc<AnalyzeInteractor> {
        Arc::clone(&self.analyze_interactor)
    }

    fn probe_port(&self) -> Arc<dyn DurationProbePort> {
        Arc::clone(&self.ffprobe) as Arc<dyn DurationProbePort>
    }

    fn transcode_port(&self) -> Arc<dyn AudioTranscodePort> {
        Arc::clone(&self.ffmpeg) as Arc<dyn AudioTranscodePort>
    }

    fn rasterizer_port(&self) -> Arc<dyn PdfRasterizerPort> {
        Arc::clone(&self.poppler) as Arc<dyn PdfRasterizerPort>
    }

    fn ffmpeg_check(&self) -> Arc<dyn ToolCheckPort> {
        Arc::clone(&self.ffmpeg) as Arc<dyn ToolCheckPort>
    }

    fn tool_checks(&self) -> Vec<Arc<dyn ToolCheckPort>> {
        let tools = &self.config.tools;
        vec![
            Arc::clone(&self.ffmpeg) as Arc<dyn ToolCheckPort>,
            Arc::clone(&self.ffprobe) as Arc<dyn ToolCheckPort>,
            Arc::new(BinaryCheck::new("pdftoppm", &tools.pdftoppm, "-v")),
            Arc::new(BinaryCheck::new("pdfinfo", &tools.pdfinfo, "-v")),
        ]
    }
}
