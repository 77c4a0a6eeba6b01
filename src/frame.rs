/// Raw decoded frame in packed RGB24 layout.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// `width * height * 3` bytes, row-major.
    pub pixels: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), (width as usize) * (height as usize) * 3);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Frame filled with a single color. Mostly useful for tests.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let mut pixels = Vec::with_capacity((width as usize) * (height as usize) * 3);
        for _ in 0..(width as usize) * (height as usize) {
            pixels.extend_from_slice(&rgb);
        }
        Self::new(width, height, pixels)
    }

    pub fn byte_len(&self) -> usize {
        (self.width as usize) * (self.height as usize) * 3
    }
}

/// One frame selected from the video at the sampling stride.
///
/// Consumed once by the frame analyzer and not retained afterward, so memory
/// stays bounded regardless of video length.
#[derive(Debug, Clone)]
pub struct SampleFrame {
    /// Index of the frame in the decoded sequence, starting at 0.
    pub index: u64,
    /// Presentation time in seconds. 0 for every frame when the source
    /// reports a non-positive frame rate.
    pub timestamp_seconds: f64,
    pub frame: Frame,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_frame_size() {
        let frame = Frame::filled(4, 2, [10, 20, 30]);
        assert_eq!(frame.pixels.len(), 4 * 2 * 3);
        assert_eq!(frame.byte_len(), 24);
        assert_eq!(&frame.pixels[..3], &[10, 20, 30]);
    }

    #[test]
    fn test_sample_frame_carries_timing() {
        let sample = SampleFrame {
            index: 60,
            timestamp_seconds: 2.0,
            frame: Frame::filled(2, 2, [0, 0, 0]),
        };
        assert_eq!(sample.index, 60);
        assert_eq!(sample.timestamp_seconds, 2.0);
        assert_eq!(sample.frame.byte_len(), 12);
    }
}
