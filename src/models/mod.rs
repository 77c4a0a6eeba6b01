pub mod providers;

use crate::error::ModelError;
use crate::frame::Frame;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One labeled, scored, boxed detection as returned by the detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    /// In [0, 1]
    pub confidence: f64,
    /// Pixel coordinates (x1, y1, x2, y2)
    #[serde(rename = "box")]
    pub bbox: [f64; 4],
}

impl Detection {
    pub fn new(label: impl Into<String>, confidence: f64, bbox: [f64; 4]) -> Self {
        Self {
            label: label.into(),
            confidence,
            bbox,
        }
    }

    /// Normalized box center, given the frame dimensions.
    pub fn center(&self, width: u32, height: u32) -> (f64, f64) {
        let cx = (self.bbox[0] + self.bbox[2]) / 2.0 / width as f64;
        let cy = (self.bbox[1] + self.bbox[3]) / 2.0 / height as f64;
        (cx, cy)
    }
}

/// Caption model collaborator: one frame in, one description out.
///
/// Implementations are injected into the pipeline, never looked up from
/// ambient state, so tests can substitute deterministic mocks.
#[async_trait]
pub trait Captioner: Send + Sync {
    async fn describe(&self, frame: &Frame) -> Result<String, ModelError>;

    /// Whether the collaborator can currently serve requests.
    async fn is_available(&self) -> bool {
        true
    }
}

/// Detection model collaborator: one frame in, scored candidates out.
///
/// `recall_threshold` is the model-side candidate cutoff; the pipeline
/// applies its own stricter precision gate afterwards.
#[async_trait]
pub trait Detector: Send + Sync {
    async fn detect(
        &self,
        frame: &Frame,
        recall_threshold: f64,
    ) -> Result<Vec<Detection>, ModelError>;

    async fn is_available(&self) -> bool {
        true
    }
}

/// Dominant-color collaborator for the image analysis variant. Failure yields
/// an empty palette rather than an error.
pub trait ColorClusterer: Send + Sync {
    fn cluster(&self, frame: &Frame, k: usize) -> Vec<String>;
}
