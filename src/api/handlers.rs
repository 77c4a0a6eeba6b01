//! Request handlers: upload handling, temp storage and pipeline invocation.

use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use tracing::info;

use super::models::HealthStatus;
use crate::analysis::{AnalysisResult, ImageAnalysis};
use crate::config::Config;
use crate::image_analysis::ImageAnalyzer;
use crate::models::{Captioner, ColorClusterer, Detector};
use crate::pipeline::VideoAnalyzer;
use crate::source::{FfmpegFrameSource, FrameSource};

/// Report service and collaborator health.
pub async fn health_check(
    captioner: &Arc<dyn Captioner>,
    detector: &Arc<dyn Detector>,
) -> HealthStatus {
    HealthStatus {
        status: "healthy".to_string(),
        caption_model: captioner.is_available().await,
        detection_model: detector.is_available().await,
    }
}

/// Analyze an uploaded video: stage the bytes in a temp file, run the
/// pipeline, and let the temp file delete itself on every exit path.
pub async fn analyze_video(
    captioner: Arc<dyn Captioner>,
    detector: Arc<dyn Detector>,
    config: Arc<Config>,
    video_bytes: Vec<u8>,
) -> Result<AnalysisResult> {
    if video_bytes.is_empty() {
        return Err(anyhow!("No video file provided"));
    }

    let temp = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(".mp4")
        .tempfile()
        .context("failed to create temp storage for upload")?;

    tokio::fs::write(temp.path(), &video_bytes)
        .await
        .context("failed to stage upload")?;

    info!("📼 Staged {} byte upload at {}", video_bytes.len(), temp.path().display());

    let analyzer = VideoAnalyzer::new(captioner, detector, config);
    let result = analyzer.analyze_file(temp.path()).await;

    // `temp` drops here, removing the staged file
    Ok(result)
}

/// Analyze an uploaded still image.
pub async fn analyze_image(
    captioner: Arc<dyn Captioner>,
    detector: Arc<dyn Detector>,
    clusterer: Arc<dyn ColorClusterer>,
    config: Arc<Config>,
    image_bytes: Vec<u8>,
) -> Result<ImageAnalysis> {
    if image_bytes.is_empty() {
        return Err(anyhow!("No image file provided"));
    }

    let temp = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(".img")
        .tempfile()
        .context("failed to create temp storage for upload")?;

    tokio::fs::write(temp.path(), &image_bytes)
        .await
        .context("failed to stage upload")?;

    // An image is a one-frame video as far as the decoder is concerned
    let mut source = FfmpegFrameSource::open(temp.path())
        .await
        .map_err(|e| anyhow!("Error processing image: {}", e))?;
    let frame = source
        .read_next()
        .await
        .map_err(|e| anyhow!("Error processing image: {}", e))?
        .ok_or_else(|| anyhow!("Error processing image: no frame decoded"))?;
    source.close().await;

    let analyzer = ImageAnalyzer::new(captioner, detector, clusterer, config);
    Ok(analyzer.analyze(&frame).await)
}
