//! Command implementations

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::app::container::{AppContainer, DefaultAppContainer};
use crate::app::{AnalyzeRequest, ProgressFn};
use crate::cli::args::{AnalyzeArgs, AssembleArgs, PcmArgs, ProbeArgs, RasterizeArgs, SplitArgs};
use crate::domain::errors::DomainError;
use crate::domain::model::{AssemblyPlan, SlideRenderInput};
use crate::domain::rules::{ScriptSplitter, SlideCountEstimator};
use crate::domain::wav;

/// Execute the assemble command
pub async fn assemble(container: &DefaultAppContainer, args: AssembleArgs) -> Result<()> {
    let slides = match &args.plan {
        Some(plan_path) => {
            let json = tokio::fs::read_to_string(plan_path)
                .await
                .with_context(|| format!("Failed to read plan {}", plan_path.display()))?;
            AssemblyPlan::from_json(&json)?.slides
        }
        None => args
            .slides
            .iter()
            .map(|pair| SlideRenderInput::parse_pair(pair))
            .collect::<Result<Vec<_>, _>>()?,
    };

    let ffmpeg = container.ffmpeg_check();
    if !ffmpeg.is_available().await {
        return Err(DomainError::ToolUnavailable {
            tool: ffmpeg.tool_name().to_string(),
        }
        .into());
    }

    let progress: ProgressFn = &|done, total| {
        info!("Progress: {}/{} slides rendered", done, total);
    };
    let report = container
        .assemble_interactor()
        .assemble(&slides, &args.output, Some(progress))
        .await
        .context("Assembly failed")?;

    println!("{}", report.output_path.display());
    Ok(())
}

/// Execute the frame-wav command
pub async fn frame_wav(container: &DefaultAppContainer, args: PcmArgs) -> Result<()> {
    let format = container.config().audio.pcm_format();
    format.validate()?;
    let pcm = tokio::fs::read(&args.input)
        .await
        .with_context(|| format!("Failed to read PCM {}", args.input.display()))?;

    let framed = wav::frame(&pcm, format)?;
    tokio::fs::write(&args.output, framed)
        .await
        .with_context(|| format!("Failed to write WAV {}", args.output.display()))?;

    info!(
        output = %args.output.display(),
        duration_secs = format.duration_secs(pcm.len()),
        "Framed PCM as WAV ({})",
        format
    );
    Ok(())
}

/// Execute the encode-mp3 command
pub async fn encode_mp3(container: &DefaultAppContainer, args: PcmArgs) -> Result<()> {
    let format = container.config().audio.pcm_format();
    format.validate()?;
    if !args.input.exists() {
        bail!("Input file does not exist: {}", args.input.display());
    }

    container
        .transcode_port()
        .pcm_to_mp3(&args.input, &args.output, format)
        .await
        .context("MP3 encoding failed")?;
    info!(output = %args.output.display(), "Encoded MP3");
    Ok(())
}

/// Execute the probe command
pub async fn probe(container: &DefaultAppContainer, args: ProbeArgs) -> Result<()> {
    let duration = container
        .probe_port()
        .probe_duration(&args.audio)
        .await
        .with_context(|| format!("Failed to probe {}", args.audio.display()))?;
    println!("{:.3}", duration);
    Ok(())
}

/// Execute the rasterize command
pub async fn rasterize(container: &DefaultAppContainer, args: RasterizeArgs) -> Result<()> {
    let rasterizer = container.rasterizer_port();
    if !rasterizer.is_available().await {
        return Err(DomainError::ToolUnavailable {
            tool: "pdftoppm/pdfinfo".to_string(),
        }
        .into());
    }

    let images = rasterizer
        .rasterize(&args.pdf, &args.out_dir, container.config().pdf.dpi)
        .await
        .context("Rasterization failed")?;
    for image in images {
        println!("{}", image.display());
    }
    Ok(())
}

/// Execute the split command
pub async fn split(args: SplitArgs) -> Result<()> {
    let manuscript = tokio::fs::read_to_string(&args.manuscript)
        .await
        .with_context(|| format!("Failed to read manuscript {}", args.manuscript.display()))?;

    let slide_count = args
        .slides
        .unwrap_or_else(|| SlideCountEstimator::from_manuscript(&manuscript));
    let scripts = ScriptSplitter::split(&manuscript, slide_count);
    if scripts.is_empty() {
        warn!("Manuscript is empty");
    }

    println!("{}", serde_json::to_string_pretty(&scripts)?);
    Ok(())
}

/// Execute the analyze command
pub async fn analyze(container: &DefaultAppContainer, args: AnalyzeArgs) -> Result<()> {
    let manuscript = match &args.manuscript {
        Some(path) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read manuscript {}", path.display()))?,
        ),
        None => None,
    };

    let analysis = container
        .analyze_interactor()
        .analyze(AnalyzeRequest {
            pdf_path: args.pdf,
            manuscript,
            project_dir: args.project_dir,
        })
        .await?;

    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}

/// Execute the check command
pub async fn check(container: &DefaultAppContainer) -> Result<()> {
    let mut ffmpeg_available = false;
    for tool in container.tool_checks() {
        let available = tool.is_available().await;
        if tool.tool_name() == "ffmpeg" {
            ffmpeg_available = available;
        }
        println!("{}: {}", tool.tool_name(), availability(available));
    }

    if !ffmpeg_available {
        bail!("ffmpeg is required but was not found");
    }
    Ok(())
}

fn availability(available: bool) -> &'static str {
    if available {
        "available"
    } else {
        "missing"
    }
}
