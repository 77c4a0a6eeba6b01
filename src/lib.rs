/// video-insight
///
/// Video scene analysis library: samples frames from a video at a fixed
/// temporal stride, runs caption and object-detection models on each sample,
/// tracks scene transitions, and synthesizes a summary plus a timed caption
/// track.

pub mod analysis;
pub mod api;
pub mod colors;
pub mod config;
pub mod error;
pub mod frame;
pub mod image_analysis;
pub mod models;
pub mod pipeline;
pub mod source;

// Re-export main types for easy access
pub use crate::analysis::{AnalysisResult, CaptionSegment, ImageAnalysis, SceneRecord};
pub use crate::colors::KMeansClusterer;
pub use crate::config::Config;
pub use crate::error::{ModelError, SourceError};
pub use crate::frame::{Frame, SampleFrame};
pub use crate::image_analysis::ImageAnalyzer;
pub use crate::models::{Captioner, ColorClusterer, Detection, Detector};
pub use crate::pipeline::VideoAnalyzer;
pub use crate::source::{FfmpegFrameSource, FrameSource};
