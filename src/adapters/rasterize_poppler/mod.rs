//! Poppler adapter for PDF page counting and rasterization

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use crate::adapters::process::{ToolCommand, ToolOutput};
use crate::domain::errors::*;
use crate::ports::*;

/// Prefix of the page images written by `pdftoppm`
pub const PAGE_IMAGE_PREFIX: &str = "slide";

/// `pdftoppm` / `pdfinfo` based rasterizer
pub struct PopplerAdapter {
    pdftoppm: PathBuf,
    pdfinfo: PathBuf,
}

impl PopplerAdapter {
    pub fn new(pdftoppm: impl Into<PathBuf>, pdfinfo: impl Into<PathBuf>) -> Self {
        Self {
            pdftoppm: pdftoppm.into(),
            pdfinfo: pdfinfo.into(),
        }
    }

    pub fn rasterize_command(&self, pdf_path: &Path, out_dir: &Path, dpi: u32) -> ToolCommand {
        ToolCommand::new(&self.pdftoppm)
            .args(["-png".to_string(), "-r".to_string(), dpi.to_string()])
            .arg(pdf_path)
            .arg(out_dir.join(PAGE_IMAGE_PREFIX))
    }

    /// Extract `Pages: N` from `pdfinfo` output
    pub fn parse_page_count(info: &str) -> Option<usize> {
        info.lines().find_map(|line| {
            line.strip_prefix("Pages:")
                .and_then(|rest| rest.trim().parse::<usize>().ok())
        })
    }

    /// Sorted `slide*.png` entries of `dir`
    pub async fn list_page_images(dir: &Path) -> Result<Vec<PathBuf>, DomainError> {
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut images = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(PAGE_IMAGE_PREFIX) && name.ends_with(".png") {
                images.push(entry.path());
            }
        }
        images.sort();
        Ok(images)
    }
}

fn check_success(result: std::io::Result<ToolOutput>) -> Result<ToolOutput, DomainError> {
    let output = result.map_err(|e| DomainError::RasterizeFailed {
        exit_code: None,
        stderr: e.to_string(),
    })?;
    if !output.success() {
        return Err(DomainError::RasterizeFailed {
            exit_code: output.exit_code(),
            stderr: output.stderr,
        });
    }
    Ok(output)
}

#[async_trait]
impl PdfRasterizerPort for PopplerAdapter {
    /// Both `pdftoppm` and `pdfinfo` are needed
    async fn is_available(&self) -> bool {
        for binary in [&self.pdftoppm, &self.pdfinfo] {
            if !matches!(
                ToolCommand::new(binary).arg("-v").run().await,
                Ok(output) if output.success()
            ) {
                return false;
            }
        }
        true
    }

    async fn page_count(&self, pdf_path: &Path) -> Result<usize, DomainError> {
        let output = check_success(ToolCommand::new(&self.pdfinfo).arg(pdf_path).run().await)?;
        Self::parse_page_count(&output.stdout).ok_or_else(|| DomainError::RasterizeFailed {
            exit_code: output.exit_code(),
            stderr: "Could not parse page count from pdfinfo output".to_string(),
        })
    }

    async fn rasterize(
        &self,
        pdf_path: &Path,
        out_dir: &Path,
        dpi: u32,
    ) -> Result<Vec<PathBuf>, DomainError> {
        tokio::fs::create_dir_all(out_dir).await?;
        check_success(self.rasterize_command(pdf_path, out_dir, dpi).run().await)?;

        let images = Self::list_page_images(out_dir).await?;
        info!(
            pdf = %pdf_path.display(),
            pages = images.len(),
            dpi,
            "Rasterized PDF"
        );
        Ok(images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_count() {
        let info = "Title:          Deck\nProducer:       LibreOffice\nPages:          12\nEncrypted:      no\n";
        assert_eq!(PopplerAdapter::parse_page_count(info), Some(12));
        assert_eq!(PopplerAdapter::parse_page_count("Title: x\n"), None);
        assert_eq!(PopplerAdapter::parse_page_count("Pages: many\n"), None);
    }

    #[test]
    fn test_rasterize_command_args() {
        let adapter = PopplerAdapter::new("pdftoppm", "pdfinfo");
        let command = adapter.rasterize_command(Path::new("/p/deck.pdf"), Path::new("/p/images"), 150);
        assert_eq!(
            command.arg_strings(),
            vec!["-png", "-r", "150", "/p/deck.pdf", "/p/images/slide"]
        );
    }

    #[tokio::test]
    async fn test_list_page_images_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["slide-10.png", "slide-02.png", "slide-01.png", "notes.png", "slide-03.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }

        let images = PopplerAdapter::list_page_images(dir.path()).await.unwrap();
        let names: Vec<String> = images
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["slide-01.png", "slide-02.png", "slide-10.png"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unavailable_when_pdfinfo_missing() {
        let adapter = PopplerAdapter::new("true", "/nonexistent/pdfinfo");
        assert!(!adapter.is_available().await);
        assert!(PopplerAdapter::new("true", "true").is_available().await);
    }

    #[tokio::test]
    async fn test_missing_binaries() {
        let adapter = PopplerAdapter::new("/nonexistent/pdftoppm", "/nonexistent/pdfinfo");
        assert!(!adapter.is_available().await);
        assert!(matches!(
            adapter.page_count(Path::new("deck.pdf")).await,
            Err(DomainError::RasterizeFailed { exit_code: None, .. })
        ));
    }
}
