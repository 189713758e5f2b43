// Narrate interactor - Synthesizes slide narration into WAV/MP3 files

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::wav;
use crate::ports::*;

/// Inputs for narrating one slide
#[derive(Debug, Clone)]
pub struct NarrateRequest {
    pub slide_number: usize,
    pub text: String,
    pub options: SpeechOptions,
    pub audio_dir: PathBuf,
    /// Portrait used for the lip-synced avatar clip
    pub avatar_image: Option<PathBuf>,
}

/// Interactor for the narration use case
pub struct NarrateInteractor {
    synthesizer: Arc<dyn SpeechSynthesisPort>,
    transcoder: Arc<dyn AudioTranscodePort>,
    lipsync: Option<Arc<dyn LipsyncPort>>,
    format: PcmFormat,
}

impl NarrateInteractor {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesisPort>,
        transcoder: Arc<dyn AudioTranscodePort>,
        format: PcmFormat,
    ) -> Self {
        Self {
            synthesizer,
            transcoder,
            lipsync: None,
            format,
        }
    }

    pub fn with_lipsync(mut self, lipsync: Arc<dyn LipsyncPort>) -> Self {
        self.lipsync = Some(lipsync);
        self
    }

    /// Base name shared by every file produced for a slide
    pub fn file_stem(slide_number: usize) -> String {
        format!("slide_{:0width$}", slide_number, width = SEGMENT_INDEX_WIDTH)
    }

    pub async fn narrate(&self, request: &NarrateRequest) -> Result<NarrationOutput, DomainError> {
        if request.text.trim().is_empty() {
            return Err(DomainError::BadArgs(format!(
                "Slide {} has no narration text",
                request.slide_number
            )));
        }

        let pcm = self
            .synthesizer
            .synthesize(&request.text, &request.options)
            .await?;
        let duration_secs = self.format.duration_secs(pcm.len());
        debug!(
            slide = request.slide_number,
            bytes = pcm.len(),
            format = %self.format,
            "Synthesized narration"
        );

        tokio::fs::create_dir_all(&request.audio_dir).await?;
        let stem = Self::file_stem(request.slide_number);
        let wav_path = request.audio_dir.join(format!("{}.wav", stem));
        let pcm_path = request.audio_dir.join(format!("{}.pcm", stem));
        let mp3_path = request.audio_dir.join(format!("{}.mp3", stem));

        let framed = wav::frame(&pcm, self.format)?;

        tokio::fs::write(&pcm_path, &pcm).await?;
        let transcoded = self
            .transcoder
            .pcm_to_mp3(&pcm_path, &mp3_path, self.format)
            .await;
        remove_quietly(&pcm_path).await;
        transcoded?;

        tokio::fs::write(&wav_path, framed).await?;

        let avatar_video_path = match (&self.lipsync, &request.avatar_image) {
            (Some(lipsync), Some(image)) => Some(
                self.render_avatar(lipsync.as_ref(), image, &mp3_path, &request.audio_dir, &stem)
                    .await?,
            ),
            _ => None,
        };

        info!(
            slide = request.slide_number,
            duration_secs,
            avatar = avatar_video_path.is_some(),
            "Narration ready"
        );
        Ok(NarrationOutput {
            wav_path,
            mp3_path,
            avatar_video_path,
            duration_secs,
        })
    }

    async fn render_avatar(
        &self,
        lipsync: &dyn LipsyncPort,
        image: &Path,
        audio: &Path,
        audio_dir: &Path,
        stem: &str,
    ) -> Result<PathBuf, DomainError> {
        let image = tokio::fs::read(image).await?;
        let audio = tokio::fs::read(audio).await?;
        let video = lipsync.generate(&image, &audio).await?;

        let path = audio_dir.join(format!("{}_avatar.mp4", stem));
        tokio::fs::write(&path, video).await?;
        Ok(path)
    }
}

async fn remove_quietly(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), "Failed to remove temporary file: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeSynth(Vec<u8>);

    #[async_trait]
    impl SpeechSynthesisPort for FakeSynth {
        async fn synthesize(&self, _text: &str, _options: &SpeechOptions) -> Result<Vec<u8>, DomainError> {
            Ok(self.0.clone())
        }
    }

    /// Copies the PCM into the MP3 path and records what it saw
    #[derive(Default)]
    struct FakeTranscoder {
        seen_pcm: Mutex<Option<Vec<u8>>>,
        fail: bool,
    }

    #[async_trait]
    impl AudioTranscodePort for FakeTranscoder {
        async fn pcm_to_mp3(&self, pcm_path: &Path, mp3_path: &Path, _format: PcmFormat) -> Result<(), DomainError> {
            let pcm = std::fs::read(pcm_path)?;
            *self.seen_pcm.lock().unwrap() = Some(pcm.clone());
            if self.fail {
                return Err(DomainError::TranscodeFailed {
                    exit_code: Some(1),
                    stderr: "bad input".to_string(),
                });
            }
            std::fs::write(mp3_path, pcm)?;
            Ok(())
        }
    }

    struct FakeLipsync;

    #[async_trait]
    impl LipsyncPort for FakeLipsync {
        async fn generate(&self, image: &[u8], audio: &[u8]) -> Result<Vec<u8>, DomainError> {
            Ok([image, audio].concat())
        }
    }

    fn request(dir: &Path, text: &str) -> NarrateRequest {
        NarrateRequest {
            slide_number: 2,
            text: text.to_string(),
            options: SpeechOptions::default(),
            audio_dir: dir.join("audio"),
            avatar_image: None,
        }
    }

    #[tokio::test]
    async fn test_writes_wav_and_mp3_and_removes_pcm() {
        let dir = tempfile::tempdir().unwrap();
        let pcm = vec![1u8; 48_000];
        let transcoder = Arc::new(FakeTranscoder::default());
        let interactor = NarrateInteractor::new(
            Arc::new(FakeSynth(pcm.clone())),
            transcoder.clone(),
            PcmFormat::default(),
        );

        let output = interactor.narrate(&request(dir.path(), "Hello")).await.unwrap();

        assert_eq!(output.wav_path, dir.path().join("audio/slide_002.wav"));
        let wav_bytes = std::fs::read(&output.wav_path).unwrap();
        assert_eq!(wav_bytes.len(), wav::WAV_HEADER_LEN + pcm.len());
        assert_eq!(&wav_bytes[wav::WAV_HEADER_LEN..], pcm.as_slice());

        assert_eq!(transcoder.seen_pcm.lock().unwrap().as_deref(), Some(pcm.as_slice()));
        assert!(output.mp3_path.exists());
        assert!(!dir.path().join("audio/slide_002.pcm").exists());
        assert!(output.avatar_video_path.is_none());
        assert!((output.duration_secs - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_rejects_blank_text() {
        let dir = tempfile::tempdir().unwrap();
        let interactor = NarrateInteractor::new(
            Arc::new(FakeSynth(vec![0; 4])),
            Arc::new(FakeTranscoder::default()),
            PcmFormat::default(),
        );

        let result = interactor.narrate(&request(dir.path(), "  \n")).await;
        assert!(matches!(result, Err(DomainError::BadArgs(_))));
        assert!(!dir.path().join("audio").exists());
    }

    #[tokio::test]
    async fn test_transcode_failure_leaves_no_audio_files() {
        let dir = tempfile::tempdir().unwrap();
        let interactor = NarrateInteractor::new(
            Arc::new(FakeSynth(vec![0; 4])),
            Arc::new(FakeTranscoder {
                fail: true,
                ..Default::default()
            }),
            PcmFormat::default(),
        );

        let result = interactor.narrate(&request(dir.path(), "Hi")).await;
        assert!(matches!(result, Err(DomainError::TranscodeFailed { .. })));
        assert!(!dir.path().join("audio/slide_002.pcm").exists());
        assert!(!dir.path().join("audio/slide_002.wav").exists());
    }

    #[tokio::test]
    async fn test_avatar_clip_written_when_lipsync_configured() {
        let dir = tempfile::tempdir().unwrap();
        let avatar = dir.path().join("avatar.png");
        std::fs::write(&avatar, b"IMG").unwrap();

        let interactor = NarrateInteractor::new(
            Arc::new(FakeSynth(vec![7; 4])),
            Arc::new(FakeTranscoder::default()),
            PcmFormat::default(),
        )
        .with_lipsync(Arc::new(FakeLipsync));

        let mut req = request(dir.path(), "Hi");
        req.avatar_image = Some(avatar);
        let output = interactor.narrate(&req).await.unwrap();

        let clip = output.avatar_video_path.unwrap();
        assert_eq!(clip, dir.path().join("audio/slide_002_avatar.mp4"));
        assert_eq!(std::fs::read(clip).unwrap(), b"IMG\x07\x07\x07\x07");
    }
}
