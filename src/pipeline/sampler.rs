use crate::frame::{Frame, SampleFrame};

/// Selects frames from the decoded sequence at a fixed temporal stride.
///
/// The sampler walks frames in index order and accepts one whenever
/// `index % interval == 0`, up to a fixed scene budget. A non-positive frame
/// rate degrades the interval to 1 and stamps every sample at t = 0; that is
/// a documented degraded mode for malformed sources, not a failure.
#[derive(Debug)]
pub struct FrameSampler {
    fps: f64,
    interval: u64,
    budget: usize,
    next_index: u64,
    accepted: usize,
}

impl FrameSampler {
    pub fn new(fps: f64, interval_seconds: f64, budget: usize) -> Self {
        let interval = if fps > 0.0 {
            ((fps * interval_seconds).round() as u64).max(1)
        } else {
            1
        };

        Self {
            fps,
            interval,
            budget,
            next_index: 0,
            accepted: 0,
        }
    }

    /// Offer the next frame in sequence. Returns the stamped sample when the
    /// frame falls on the stride and the budget is not spent; otherwise the
    /// frame is dropped.
    pub fn offer(&mut self, frame: Frame) -> Option<SampleFrame> {
        let index = self.next_index;
        self.next_index += 1;

        if self.accepted >= self.budget || index % self.interval != 0 {
            return None;
        }

        self.accepted += 1;
        let timestamp_seconds = if self.fps > 0.0 {
            index as f64 / self.fps
        } else {
            0.0
        };

        Some(SampleFrame {
            index,
            timestamp_seconds,
            frame,
        })
    }

    /// True once the scene budget is spent; callers can stop decoding.
    pub fn exhausted(&self) -> bool {
        self.accepted >= self.budget
    }

    pub fn interval(&self) -> u64 {
        self.interval
    }

    pub fn accepted(&self) -> usize {
        self.accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_frame() -> Frame {
        Frame::filled(2, 2, [0, 0, 0])
    }

    #[test]
    fn test_interval_from_fps() {
        assert_eq!(FrameSampler::new(30.0, 2.0, 12).interval(), 60);
        assert_eq!(FrameSampler::new(29.97, 2.0, 12).interval(), 60);
        assert_eq!(FrameSampler::new(0.2, 2.0, 12).interval(), 1);
        // Degraded mode for malformed sources
        assert_eq!(FrameSampler::new(0.0, 2.0, 12).interval(), 1);
        assert_eq!(FrameSampler::new(-1.0, 2.0, 12).interval(), 1);
    }

    #[test]
    fn test_30fps_600_frames_yields_10_samples() {
        let mut sampler = FrameSampler::new(30.0, 2.0, 12);
        let mut timestamps = Vec::new();

        for _ in 0..600 {
            if let Some(sample) = sampler.offer(dummy_frame()) {
                timestamps.push(sample.timestamp_seconds);
            }
        }

        assert_eq!(timestamps.len(), 10);
        let expected: Vec<f64> = (0..10).map(|i| (i * 2) as f64).collect();
        assert_eq!(timestamps, expected);
    }

    #[test]
    fn test_budget_stops_sampling() {
        let mut sampler = FrameSampler::new(1.0, 2.0, 3);
        let mut count = 0;

        for _ in 0..100 {
            if sampler.exhausted() {
                break;
            }
            if sampler.offer(dummy_frame()).is_some() {
                count += 1;
            }
        }

        assert_eq!(count, 3);
        assert!(sampler.exhausted());
    }

    #[test]
    fn test_degraded_fps_stamps_zero_timestamps() {
        let mut sampler = FrameSampler::new(0.0, 2.0, 4);
        let mut samples = Vec::new();
        for _ in 0..4 {
            if let Some(s) = sampler.offer(dummy_frame()) {
                samples.push(s);
            }
        }
        // Interval 1: every frame accepted, all stamped at zero
        assert_eq!(samples.len(), 4);
        assert!(samples.iter().all(|s| s.timestamp_seconds == 0.0));
    }
}
