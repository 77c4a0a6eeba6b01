//! The video scene-sampling and temporal-aggregation pipeline.
//!
//! Sampler → per-frame analyzer → scene tracker → aggregator → caption
//! synthesizer. Processing is strictly sequential: transition detection
//! compares each sample against exactly the immediately preceding one, so
//! samples must be analyzed in increasing index order.

pub mod aggregate;
pub mod analyzer;
pub mod captions;
pub mod sampler;
pub mod tracker;

use crate::analysis::AnalysisResult;
use crate::config::Config;
use crate::error::SourceError;
use crate::models::{Captioner, Detector};
use crate::source::{FfmpegFrameSource, FrameSource};
use aggregate::SceneAggregator;
use analyzer::FrameAnalyzer;
use sampler::FrameSampler;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Pipeline lifecycle, mostly for log context. Per-frame failures are
/// absorbed below this level and never reach `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PipelineStage {
    Init,
    Sampling,
    Aggregating,
    Done,
    Error,
}

/// One video analysis run: owns no shared mutable state, so independent
/// requests can each construct and drive their own instance.
pub struct VideoAnalyzer {
    captioner: Arc<dyn Captioner>,
    detector: Arc<dyn Detector>,
    config: Arc<Config>,
}

impl VideoAnalyzer {
    /// Collaborators are injected, never looked up from ambient state.
    pub fn new(captioner: Arc<dyn Captioner>, detector: Arc<dyn Detector>, config: Arc<Config>) -> Self {
        Self {
            captioner,
            detector,
            config,
        }
    }

    /// Analyze a video file on disk.
    ///
    /// A source that cannot be opened is reported through the result object:
    /// an explanatory summary with empty scenes and captions, so callers
    /// always receive the full schema.
    pub async fn analyze_file(&self, path: &Path) -> AnalysisResult {
        let mut source = match FfmpegFrameSource::open(path).await {
            Ok(source) => source,
            Err(e) => {
                error!("Unable to open {}: {}", path.display(), e);
                return AnalysisResult::no_content(format!("Error processing video: {}", e), 0.0, 0);
            }
        };

        let result = self.analyze_source(&mut source).await;
        // Decoder release must happen on every exit path
        source.close().await;
        result
    }

    /// Drive the pipeline over an already-open frame source.
    pub async fn analyze_source<S: FrameSource>(&self, source: &mut S) -> AnalysisResult {
        let mut stage = PipelineStage::Init;
        debug!("Pipeline stage: {:?}", stage);

        let fps = source.fps();
        let total_frames = source.total_frames();
        let duration = if fps > 0.0 {
            total_frames as f64 / fps
        } else {
            0.0
        };

        if duration <= 0.0 || total_frames <= 1 {
            info!("Source has no analyzable content ({} frames, {:.1}s)", total_frames, duration);
            return AnalysisResult::no_content("No video content could be analyzed.", fps, total_frames);
        }

        let mut sampler = FrameSampler::new(
            fps,
            self.config.sampling.interval_seconds,
            self.config.sampling.max_scenes,
        );
        let mut frame_analyzer = FrameAnalyzer::new(
            self.captioner.clone(),
            self.detector.clone(),
            self.config.detection.clone(),
        );
        let mut tracker = tracker::SceneTracker::new();
        let mut aggregator = SceneAggregator::new(self.config.summary.clone());

        stage = PipelineStage::Sampling;
        debug!("Pipeline stage: {:?} (interval {} frames)", stage, sampler.interval());

        loop {
            if sampler.exhausted() {
                break;
            }

            let frame = match source.read_next().await {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(SourceError::Decode(e)) => {
                    // Keep whatever was sampled before the corruption
                    warn!("Decode error, treating as end of stream: {}", e);
                    break;
                }
                Err(SourceError::Open(e)) => {
                    stage = PipelineStage::Error;
                    error!("Pipeline stage: {:?}: {}", stage, e);
                    return AnalysisResult::no_content(
                        format!("Error processing video: {}", e),
                        fps,
                        total_frames,
                    );
                }
            };

            let Some(sample) = sampler.offer(frame) else {
                continue;
            };

            debug!("Analyzing sample {} at {:.1}s", sample.index, sample.timestamp_seconds);
            let analysis = frame_analyzer.analyze(&sample).await;
            tracker.observe(&analysis.detections, self.config.summary.transition_objects);
            aggregator.push(&sample, &analysis);
        }

        stage = PipelineStage::Aggregating;
        debug!("Pipeline stage: {:?}", stage);

        let captions = captions::synthesize(aggregator.scenes(), duration, &self.config.captions);
        let result = aggregator.finish(&tracker, captions, duration, fps, total_frames);

        stage = PipelineStage::Done;
        info!(
            "Pipeline stage: {:?}: {} scenes, {} transitions over {:.1}s",
            stage,
            result.scenes.len(),
            result.scene_transitions,
            duration
        );

        result
    }
}
