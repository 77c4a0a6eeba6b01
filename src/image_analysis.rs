//! Single-image analysis variant: caption, detections, dominant colors and a
//! composition report for one still image.

use crate::analysis::{Composition, ImageAnalysis, ImageSize};
use crate::config::Config;
use crate::frame::Frame;
use crate::models::{Captioner, ColorClusterer, Detection, Detector};
use crate::pipeline::analyzer::{filter_detections, CAPTION_UNAVAILABLE};
use std::sync::Arc;
use tracing::warn;

pub struct ImageAnalyzer {
    captioner: Arc<dyn Captioner>,
    detector: Arc<dyn Detector>,
    clusterer: Arc<dyn ColorClusterer>,
    config: Arc<Config>,
}

impl ImageAnalyzer {
    pub fn new(
        captioner: Arc<dyn Captioner>,
        detector: Arc<dyn Detector>,
        clusterer: Arc<dyn ColorClusterer>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            captioner,
            detector,
            clusterer,
            config,
        }
    }

    /// Analyze one decoded image. Collaborator failures degrade the affected
    /// section to a sentinel/empty value; the report is always produced.
    pub async fn analyze(&self, frame: &Frame) -> ImageAnalysis {
        let description = match self.captioner.describe(frame).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Caption failed for image: {}", e);
                CAPTION_UNAVAILABLE.to_string()
            }
        };

        let objects = match self
            .detector
            .detect(frame, self.config.detection.recall_threshold)
            .await
        {
            Ok(raw) => filter_detections(raw, &self.config.detection),
            Err(e) => {
                warn!("Detection failed for image: {}", e);
                Vec::new()
            }
        };

        let colors = self.clusterer.cluster(frame, self.config.colors.clusters);

        let composition = compose(frame, &objects, &self.config);

        ImageAnalysis {
            description,
            objects,
            colors,
            composition,
            image_size: ImageSize {
                width: frame.width,
                height: frame.height,
            },
        }
    }
}

/// Build the composition report: dimensions, aspect ratio, orientation and,
/// when objects were detected, the focus area their box centers cluster in.
fn compose(frame: &Frame, objects: &[Detection], config: &Config) -> Composition {
    let width = frame.width;
    let height = frame.height;

    let orientation = if width > height {
        "landscape"
    } else if height > width {
        "portrait"
    } else {
        "square"
    };

    let aspect_ratio = if height > 0 {
        ((width as f64 / height as f64) * 100.0).round() / 100.0
    } else {
        0.0
    };

    let focus_area = if objects.is_empty() {
        None
    } else {
        let (mut sum_x, mut sum_y) = (0.0, 0.0);
        for object in objects {
            let (cx, cy) = object.center(width, height);
            sum_x += cx;
            sum_y += cy;
        }
        let avg_x = sum_x / objects.len() as f64;
        let avg_y = sum_y / objects.len() as f64;
        Some(focus_label(avg_x, avg_y, config).to_string())
    };

    Composition {
        dimensions: format!("{}x{}", width, height),
        aspect_ratio,
        orientation: orientation.to_string(),
        focus_area,
    }
}

fn focus_label(avg_x: f64, avg_y: f64, config: &Config) -> &'static str {
    let low = config.composition.center_band_low;
    let high = config.composition.center_band_high;

    if avg_x > low && avg_x < high && avg_y > low && avg_y < high {
        "center"
    } else if avg_x <= low {
        "left"
    } else if avg_x >= high {
        "right"
    } else if avg_y <= low {
        "top"
    } else {
        "bottom"
    }
}
