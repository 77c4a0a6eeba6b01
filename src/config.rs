use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the video analysis service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Frame sampling settings
    pub sampling: SamplingConfig,

    /// Object detection filtering settings
    pub detection: DetectionConfig,

    /// Caption track synthesis settings
    pub captions: CaptionConfig,

    /// Summary templating settings
    pub summary: SummaryConfig,

    /// Image composition heuristics
    pub composition: CompositionConfig,

    /// Dominant color extraction settings
    pub colors: ColorConfig,

    /// Model sidecar endpoints
    pub models: ModelConfig,

    /// HTTP server settings
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Seconds of video between samples
    pub interval_seconds: f64,

    /// Maximum number of scenes analyzed per video
    pub max_scenes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Recall threshold passed to the detector for candidate generation
    pub recall_threshold: f64,

    /// Stricter per-frame precision gate applied to candidates
    pub precision_threshold: f64,

    /// Maximum detections retained per frame
    pub max_detections: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionConfig {
    /// Hard cap on caption text length, in characters
    pub max_text_chars: usize,

    /// How many primary objects to list in the caption parenthetical
    pub showing_objects: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Primary objects listed per scene record
    pub primary_objects: usize,

    /// Labels reported in `objects_detected`
    pub top_objects: usize,

    /// Labels named in the summary sentence
    pub summary_objects: usize,

    /// New labels named in a transition description
    pub transition_objects: usize,
}

/// Focus-area heuristic for the image analysis variant.
///
/// The band edges are tunable heuristics, not derived values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositionConfig {
    /// Lower edge of the normalized center band
    pub center_band_low: f64,

    /// Upper edge of the normalized center band
    pub center_band_high: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorConfig {
    /// Number of dominant colors extracted
    pub clusters: usize,

    /// Target edge length the image is downsampled to before clustering
    pub sample_dim: u32,

    /// k-means refinement iterations
    pub max_iterations: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Caption model sidecar base URL
    pub caption_endpoint: String,

    /// Detection model sidecar base URL
    pub detection_endpoint: String,

    /// Per-call timeout in seconds
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen port
    pub port: u16,

    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sampling: SamplingConfig {
                interval_seconds: 2.0,
                max_scenes: 12,
            },
            detection: DetectionConfig {
                recall_threshold: 0.65,
                precision_threshold: 0.7,
                max_detections: 15,
            },
            captions: CaptionConfig {
                max_text_chars: 100,
                showing_objects: 2,
            },
            summary: SummaryConfig {
                primary_objects: 3,
                top_objects: 8,
                summary_objects: 5,
                transition_objects: 3,
            },
            composition: CompositionConfig {
                center_band_low: 0.3,
                center_band_high: 0.7,
            },
            colors: ColorConfig {
                clusters: 5,
                sample_dim: 150,
                max_iterations: 10,
            },
            models: ModelConfig {
                caption_endpoint: "http://localhost:5001".to_string(),
                detection_endpoint: "http://localhost:5002".to_string(),
                timeout_seconds: 60,
            },
            server: ServerConfig {
                port: 5000,
                max_upload_bytes: 256 * 1024 * 1024,
            },
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("failed to read config {}", path.as_ref().display()))?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.sampling.interval_seconds <= 0.0 {
            return Err(anyhow!("sampling.interval_seconds must be positive"));
        }
        if self.sampling.max_scenes == 0 {
            return Err(anyhow!("sampling.max_scenes must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.detection.recall_threshold)
            || !(0.0..=1.0).contains(&self.detection.precision_threshold)
        {
            return Err(anyhow!("detection thresholds must be within [0, 1]"));
        }
        if self.detection.precision_threshold < self.detection.recall_threshold {
            return Err(anyhow!(
                "detection.precision_threshold must not be below recall_threshold"
            ));
        }
        if self.composition.center_band_low >= self.composition.center_band_high {
            return Err(anyhow!("composition center band is inverted"));
        }
        if self.colors.clusters == 0 {
            return Err(anyhow!("colors.clusters must be at least 1"));
        }
        Ok(())
    }
}
