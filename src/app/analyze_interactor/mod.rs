// Analyze interactor - Turns a PDF deck and/or manuscript into slide scenes

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::adapters::toml_config::PdfSettings;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

/// Inputs of one analysis
#[derive(Debug, Clone, Default)]
pub struct AnalyzeRequest {
    pub pdf_path: Option<PathBuf>,
    pub manuscript: Option<String>,
    /// Page images are written to `<project_dir>/images`
    pub project_dir: PathBuf,
}

/// Interactor for the deck analysis use case
pub struct AnalyzeInteractor {
    rasterizer: Arc<dyn PdfRasterizerPort>,
    mapper: Option<Arc<dyn ScriptMapperPort>>,
    pdf_settings: PdfSettings,
}

impl AnalyzeInteractor {
    pub fn new(rasterizer: Arc<dyn PdfRasterizerPort>, pdf_settings: PdfSettings) -> Self {
        Self {
            rasterizer,
            mapper: None,
            pdf_settings,
        }
    }

    /// Use a script mapper instead of the heuristic splitter
    pub fn with_mapper(mut self, mapper: Arc<dyn ScriptMapperPort>) -> Self {
        self.mapper = Some(mapper);
        self
    }

    pub async fn analyze(&self, request: AnalyzeRequest) -> Result<DeckAnalysis, DomainError> {
        let manuscript = request
            .manuscript
            .as_deref()
            .filter(|m| !m.trim().is_empty());
        if request.pdf_path.is_none() && manuscript.is_none() {
            return Err(DomainError::BadArgs(
                "A PDF or a manuscript is required".to_string(),
            ));
        }

        let mut images = Vec::new();
        let mut page_count = 0;

        if let Some(pdf_path) = &request.pdf_path {
            if self.rasterizer.is_available().await {
                page_count = self.rasterizer.page_count(pdf_path).await?;
                images = self
                    .rasterizer
                    .rasterize(
                        pdf_path,
                        &request.project_dir.join("images"),
                        self.pdf_settings.dpi,
                    )
                    .await?;
            } else {
                let size = tokio::fs::metadata(pdf_path).await?.len();
                page_count = SlideCountEstimator::from_pdf_size(
                    size,
                    self.pdf_settings.estimate_bytes_per_page,
                );
                warn!(
                    pdf = %pdf_path.display(),
                    estimated_pages = page_count,
                    "PDF rasterizer unavailable, estimating page count without images"
                );
            }
        }

        let scenes = match manuscript {
            Some(manuscript) => {
                let slide_count = if page_count > 0 {
                    page_count
                } else {
                    SlideCountEstimator::from_manuscript(manuscript)
                };
                self.map_scripts(manuscript, slide_count)
                    .await
                    .into_iter()
                    .map(|s| Scene {
                        image_path: s
                            .slide_number
                            .checked_sub(1)
                            .and_then(|i| images.get(i))
                            .cloned(),
                        slide_number: s.slide_number,
                        script: s.script,
                    })
                    .collect::<Vec<_>>()
            }
            None if !images.is_empty() => images
                .iter()
                .enumerate()
                .map(|(i, image)| Scene {
                    slide_number: i + 1,
                    image_path: Some(image.clone()),
                    script: String::new(),
                })
                .collect(),
            None => (1..=page_count)
                .map(|slide_number| Scene {
                    slide_number,
                    image_path: None,
                    script: String::new(),
                })
                .collect(),
        };

        let slide_count = if page_count > 0 { page_count } else { scenes.len() };
        info!(slide_count, scenes = scenes.len(), "Analyzed deck");
        Ok(DeckAnalysis {
            slide_count,
            scenes,
        })
    }

    async fn map_scripts(&self, manuscript: &str, slide_count: usize) -> Vec<SlideScript> {
        if let Some(mapper) = &self.mapper {
            match mapper.map(manuscript, slide_count).await {
                Ok(scripts) => return scripts,
                Err(e) => warn!("Script mapping failed, falling back to splitter: {}", e),
            }
        }
        ScriptSplitter::split(manuscript, slide_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::Path;

    struct FakeRasterizer {
        available: bool,
        pages: usize,
    }

    #[async_trait]
    impl PdfRasterizerPort for FakeRasterizer {
        async fn is_available(&self) -> bool {
            self.available
        }

        async fn page_count(&self, _pdf_path: &Path) -> Result<usize, DomainError> {
            Ok(self.pages)
        }

        async fn rasterize(
            &self,
            _pdf_path: &Path,
            out_dir: &Path,
            _dpi: u32,
        ) -> Result<Vec<PathBuf>, DomainError> {
            Ok((1..=self.pages)
                .map(|i| out_dir.join(format!("slide-{}.png", i)))
                .collect())
        }
    }

    struct FailingMapper;

    #[async_trait]
    impl ScriptMapperPort for FailingMapper {
        async fn map(&self, _manuscript: &str, _slide_count: usize) -> Result<Vec<SlideScript>, DomainError> {
            Err(DomainError::Collaborator {
                service: "mapper".to_string(),
                message: "quota exceeded".to_string(),
            })
        }
    }

    fn interactor(available: bool, pages: usize) -> AnalyzeInteractor {
        AnalyzeInteractor::new(Arc::new(FakeRasterizer { available, pages }), PdfSettings::default())
    }

    #[tokio::test]
    async fn test_requires_some_input() {
        let result = interactor(true, 2)
            .analyze(AnalyzeRequest {
                manuscript: Some("   ".to_string()),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(DomainError::BadArgs(_))));
    }

    #[tokio::test]
    async fn test_pdf_and_manuscript_attach_images() {
        let project = tempfile::tempdir().unwrap();
        let analysis = interactor(true, 2)
            .analyze(AnalyzeRequest {
                pdf_path: Some(project.path().join("deck.pdf")),
                manuscript: Some("Slide 1: Hello\nSlide 2: Bye".to_string()),
                project_dir: project.path().to_path_buf(),
            })
            .await
            .unwrap();

        assert_eq!(analysis.slide_count, 2);
        assert_eq!(analysis.scenes.len(), 2);
        assert_eq!(analysis.scenes[1].script, "Bye");
        assert_eq!(
            analysis.scenes[1].image_path.as_deref(),
            Some(project.path().join("images").join("slide-2.png").as_path())
        );
    }

    #[tokio::test]
    async fn test_pdf_only_yields_empty_scripts() {
        let project = tempfile::tempdir().unwrap();
        let analysis = interactor(true, 3)
            .analyze(AnalyzeRequest {
                pdf_path: Some(project.path().join("deck.pdf")),
                manuscript: None,
                project_dir: project.path().to_path_buf(),
            })
            .await
            .unwrap();

        assert_eq!(analysis.slide_count, 3);
        assert!(analysis.scenes.iter().all(|s| s.script.is_empty() && s.image_path.is_some()));
    }

    #[tokio::test]
    async fn test_unavailable_rasterizer_estimates_from_size() {
        let project = tempfile::tempdir().unwrap();
        let pdf = project.path().join("deck.pdf");
        std::fs::write(&pdf, vec![0u8; 120_000]).unwrap();

        let analysis = interactor(false, 0)
            .analyze(AnalyzeRequest {
                pdf_path: Some(pdf),
                manuscript: None,
                project_dir: project.path().to_path_buf(),
            })
            .await
            .unwrap();

        assert_eq!(analysis.slide_count, 3);
        assert_eq!(analysis.scenes.len(), 3);
        assert!(analysis.scenes.iter().all(|s| s.image_path.is_none()));
    }

    #[tokio::test]
    async fn test_mapper_failure_falls_back_to_splitter() {
        let analysis = interactor(true, 0)
            .with_mapper(Arc::new(FailingMapper))
            .analyze(AnalyzeRequest {
                manuscript: Some("Slide 1: One\nSlide 2: Two".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(analysis.slide_count, 2);
        assert_eq!(analysis.scenes[0].script, "One");
    }
}
