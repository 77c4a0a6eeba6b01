use crate::error::SourceError;
use crate::frame::Frame;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStdout, Command};
use tracing::{info, warn};

/// A decoded frame stream with known frame rate and frame count.
///
/// Sources are read once, forward only. `read_next` returns `Ok(None)` at end
/// of stream; implementations must release their decoder on drop.
#[async_trait]
pub trait FrameSource: Send {
    fn fps(&self) -> f64;

    fn total_frames(&self) -> u64;

    async fn read_next(&mut self) -> Result<Option<Frame>, SourceError>;
}

/// Frame source backed by an ffmpeg subprocess decoding to raw RGB24 on
/// stdout, with stream metadata taken from ffprobe.
pub struct FfmpegFrameSource {
    fps: f64,
    total_frames: u64,
    width: u32,
    height: u32,
    child: Child,
    stdout: ChildStdout,
}

impl FfmpegFrameSource {
    /// Probe the container and start the decoder.
    pub async fn open(path: &Path) -> Result<Self, SourceError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| SourceError::Open("non-UTF-8 path".to_string()))?;

        let (fps, total_frames, width, height) = probe(path_str).await?;

        let mut child = Command::new("ffmpeg")
            .args([
                "-v", "error",
                "-i", path_str,
                "-f", "rawvideo",
                "-pix_fmt", "rgb24",
                "pipe:1",
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SourceError::Open(format!("failed to spawn ffmpeg: {}", e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SourceError::Open("ffmpeg stdout not captured".to_string()))?;

        info!(
            "📹 Opened video source: {} ({}x{}, {:.1}fps, {} frames)",
            path.display(),
            width,
            height,
            fps,
            total_frames
        );

        Ok(Self {
            fps,
            total_frames,
            width,
            height,
            child,
            stdout,
        })
    }

    /// Release the decoder. Also runs on drop via `kill_on_drop`; calling it
    /// twice is harmless.
    pub async fn close(&mut self) {
        match self.child.try_wait() {
            Ok(Some(_)) => {}
            _ => {
                if let Err(e) = self.child.kill().await {
                    warn!("Failed to stop ffmpeg decoder: {}", e);
                }
            }
        }
    }
}

#[async_trait]
impl FrameSource for FfmpegFrameSource {
    fn fps(&self) -> f64 {
        self.fps
    }

    fn total_frames(&self) -> u64 {
        self.total_frames
    }

    async fn read_next(&mut self) -> Result<Option<Frame>, SourceError> {
        let frame_bytes = (self.width as usize) * (self.height as usize) * 3;
        let mut pixels = vec![0u8; frame_bytes];
        let mut filled = 0;

        while filled < frame_bytes {
            let n = self
                .stdout
                .read(&mut pixels[filled..])
                .await
                .map_err(|e| SourceError::Decode(e.to_string()))?;
            if n == 0 {
                if filled == 0 {
                    return Ok(None);
                }
                return Err(SourceError::Decode(format!(
                    "truncated frame: {} of {} bytes",
                    filled, frame_bytes
                )));
            }
            filled += n;
        }

        Ok(Some(Frame::new(self.width, self.height, pixels)))
    }
}

/// Extract fps, frame count and dimensions from ffprobe JSON output.
async fn probe(path: &str) -> Result<(f64, u64, u32, u32), SourceError> {
    let output = Command::new("ffprobe")
        .args([
            "-v", "quiet",
            "-print_format", "json",
            "-show_format",
            "-show_streams",
            path,
        ])
        .output()
        .await
        .map_err(|e| SourceError::Open(format!("failed to run ffprobe: {}", e)))?;

    if !output.status.success() {
        return Err(SourceError::Open(format!("ffprobe failed for {}", path)));
    }

    let json_str = String::from_utf8(output.stdout)
        .map_err(|e| SourceError::Open(format!("ffprobe output not UTF-8: {}", e)))?;
    let data: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|e| SourceError::Open(format!("ffprobe output not JSON: {}", e)))?;

    let streams = data["streams"]
        .as_array()
        .ok_or_else(|| SourceError::Open("no streams in ffprobe output".to_string()))?;

    let video_stream = streams
        .iter()
        .find(|s| s["codec_type"] == "video")
        .ok_or_else(|| SourceError::Open("no video stream found".to_string()))?;

    let fps = video_stream["r_frame_rate"]
        .as_str()
        .and_then(parse_frame_rate)
        .unwrap_or(0.0);

    let width = video_stream["width"].as_u64().unwrap_or(0) as u32;
    let height = video_stream["height"].as_u64().unwrap_or(0) as u32;

    if width == 0 || height == 0 {
        return Err(SourceError::Open("video stream has no dimensions".to_string()));
    }

    // nb_frames is not stamped in every container; fall back to duration * fps
    let total_frames = video_stream["nb_frames"]
        .as_str()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| {
            let duration: f64 = data["format"]["duration"]
                .as_str()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0.0);
            (duration * fps).round() as u64
        });

    Ok((fps, total_frames, width, height))
}

/// Parse ffprobe's `num/den` frame rate notation.
fn parse_frame_rate(s: &str) -> Option<f64> {
    let parts: Vec<&str> = s.split('/').collect();
    if parts.len() == 2 {
        let num: f64 = parts[0].parse().ok()?;
        let den: f64 = parts[1].parse().ok()?;
        if den == 0.0 {
            return None;
        }
        Some(num / den)
    } else {
        s.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_rate_parsing() {
        assert_eq!(parse_frame_rate("30/1"), Some(30.0));
        assert_eq!(parse_frame_rate("30000/1001").map(|f| (f * 100.0).round()), Some(2997.0));
        assert_eq!(parse_frame_rate("25"), Some(25.0));
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("garbage"), None);
    }
}
