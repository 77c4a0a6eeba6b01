use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The analysis output for one sampled frame, treated as a discrete unit of
/// video content. Immutable once created; records are ordered by
/// `time_seconds`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneRecord {
    /// Display timestamp, `M:SS`
    pub timestamp: String,

    /// Scene start in seconds, rounded to 1 decimal
    pub time_seconds: f64,

    /// Natural-language scene description
    pub description: String,

    /// Number of detections retained for this scene
    pub objects: usize,

    /// Up to 3 labels, ordered by descending confidence
    pub primary_objects: Vec<String>,
}

/// One timed text segment of the caption track. Segments are contiguous and
/// non-overlapping; the last segment ends at the video duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Top-level result of a video analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub scenes: Vec<SceneRecord>,
    pub captions: Vec<CaptionSegment>,
    pub duration: f64,
    pub fps: f64,
    pub total_frames: u64,
    /// Most frequent labels, best first
    pub objects_detected: Vec<String>,
    /// Label occurrence counts across all scenes
    pub object_frequencies: BTreeMap<String, u32>,
    pub scene_transitions: usize,
    pub average_objects_per_scene: f64,
    /// When the analysis finished
    pub analyzed_at: chrono::DateTime<chrono::Utc>,
}

impl AnalysisResult {
    /// Well-formed result for a run that produced no content, either because
    /// the video was empty or because the source could not be opened. Callers
    /// get an explanatory summary and empty collections instead of an opaque
    /// failure.
    pub fn no_content(summary: impl Into<String>, fps: f64, total_frames: u64) -> Self {
        Self {
            summary: summary.into(),
            scenes: Vec::new(),
            captions: Vec::new(),
            duration: 0.0,
            fps,
            total_frames,
            objects_detected: Vec::new(),
            object_frequencies: BTreeMap::new(),
            scene_transitions: 0,
            average_objects_per_scene: 0.0,
            analyzed_at: chrono::Utc::now(),
        }
    }
}

/// Result of the single-image analysis variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAnalysis {
    pub description: String,
    pub objects: Vec<crate::models::Detection>,
    /// Dominant colors as `#rrggbb` strings
    pub colors: Vec<String>,
    pub composition: Composition,
    pub image_size: ImageSize,
}

/// Spatial composition report for a single image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Composition {
    /// `WxH` display string
    pub dimensions: String,

    /// Width over height, rounded to 2 decimals
    pub aspect_ratio: f64,

    /// `landscape`, `portrait` or `square`
    pub orientation: String,

    /// Where detected objects cluster, when any were detected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_area: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// Format seconds as an `M:SS` display timestamp.
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_formatting() {
        assert_eq!(format_timestamp(0.0), "0:00");
        assert_eq!(format_timestamp(9.6), "0:09");
        assert_eq!(format_timestamp(65.0), "1:05");
        assert_eq!(format_timestamp(600.0), "10:00");
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(2.0 / 3.0), 0.7);
        assert_eq!(round1(2.25), 2.3);
        assert_eq!(round1(0.0), 0.0);
    }

    #[test]
    fn test_no_content_result_is_well_formed() {
        let result = AnalysisResult::no_content("No video content could be analyzed.", 0.0, 0);
        assert!(result.scenes.is_empty());
        assert!(result.captions.is_empty());
        assert_eq!(result.average_objects_per_scene, 0.0);
        assert!(result.summary.contains("No video content"));
    }
}
