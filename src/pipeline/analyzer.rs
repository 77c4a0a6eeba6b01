use crate::config::DetectionConfig;
use crate::error::ModelError;
use crate::frame::SampleFrame;
use crate::models::{Captioner, Detection, Detector};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::warn;

/// Substituted when the caption collaborator cannot produce a description.
pub const CAPTION_UNAVAILABLE: &str = "Description unavailable.";

/// Per-frame analysis: one caption call, one detection call, normalized
/// detection output.
#[derive(Debug, Clone)]
pub struct FrameAnalysis {
    pub description: String,
    /// Sorted by descending confidence, at most one detection per label
    pub detections: Vec<Detection>,
}

/// Invokes the model collaborators for one sample frame at a time.
///
/// Collaborator failures never escape: a transient failure degrades that
/// frame's output to a sentinel/empty result, and an unavailable collaborator
/// is disabled for the rest of the run after being logged once.
pub struct FrameAnalyzer {
    captioner: Arc<dyn Captioner>,
    detector: Arc<dyn Detector>,
    config: DetectionConfig,
    caption_disabled: bool,
    detection_disabled: bool,
}

impl FrameAnalyzer {
    pub fn new(
        captioner: Arc<dyn Captioner>,
        detector: Arc<dyn Detector>,
        config: DetectionConfig,
    ) -> Self {
        Self {
            captioner,
            detector,
            config,
            caption_disabled: false,
            detection_disabled: false,
        }
    }

    pub async fn analyze(&mut self, sample: &SampleFrame) -> FrameAnalysis {
        let description = self.describe(sample).await;
        let detections = self.detect(sample).await;

        FrameAnalysis {
            description,
            detections,
        }
    }

    async fn describe(&mut self, sample: &SampleFrame) -> String {
        if self.caption_disabled {
            return CAPTION_UNAVAILABLE.to_string();
        }

        match self.captioner.describe(&sample.frame).await {
            Ok(text) => text,
            Err(ModelError::Unavailable(e)) => {
                warn!("Caption model unavailable, disabling for this run: {}", e);
                self.caption_disabled = true;
                CAPTION_UNAVAILABLE.to_string()
            }
            Err(ModelError::Transient(e)) => {
                warn!("Caption failed for frame {}: {}", sample.index, e);
                CAPTION_UNAVAILABLE.to_string()
            }
        }
    }

    async fn detect(&mut self, sample: &SampleFrame) -> Vec<Detection> {
        if self.detection_disabled {
            return Vec::new();
        }

        let raw = match self
            .detector
            .detect(&sample.frame, self.config.recall_threshold)
            .await
        {
            Ok(raw) => raw,
            Err(ModelError::Unavailable(e)) => {
                warn!("Detection model unavailable, disabling for this run: {}", e);
                self.detection_disabled = true;
                return Vec::new();
            }
            Err(ModelError::Transient(e)) => {
                warn!("Detection failed for frame {}: {}", sample.index, e);
                return Vec::new();
            }
        };

        filter_detections(raw, &self.config)
    }
}

/// Second-stage detection gate: keep candidates above the precision
/// threshold, de-duplicate by label keeping the highest-confidence instance,
/// sort by descending confidence and cap the list.
pub fn filter_detections(raw: Vec<Detection>, config: &DetectionConfig) -> Vec<Detection> {
    let mut kept: Vec<Detection> = Vec::new();

    for candidate in raw {
        if candidate.confidence <= config.precision_threshold {
            continue;
        }
        match kept.iter_mut().find(|d| d.label == candidate.label) {
            Some(existing) => {
                if candidate.confidence > existing.confidence {
                    *existing = candidate;
                }
            }
            None => kept.push(candidate),
        }
    }

    kept.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });
    kept.truncate(config.max_detections);
    kept
}
