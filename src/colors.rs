//! Dominant color extraction via k-means over RGB pixels.

use crate::config::ColorConfig;
use crate::frame::Frame;
use crate::models::ColorClusterer;

/// Deterministic k-means palette extractor.
///
/// Centroids are seeded from evenly spaced pixels rather than random draws,
/// so identical input always yields an identical palette.
pub struct KMeansClusterer {
    sample_dim: u32,
    max_iterations: usize,
}

impl KMeansClusterer {
    pub fn new(config: &ColorConfig) -> Self {
        Self {
            sample_dim: config.sample_dim,
            max_iterations: config.max_iterations,
        }
    }

    /// Collect a downsampled pixel set, at most `sample_dim^2` points.
    fn sample_pixels(&self, frame: &Frame) -> Vec<[f64; 3]> {
        let total = (frame.width as usize) * (frame.height as usize);
        if total == 0 || frame.pixels.len() < total * 3 {
            return Vec::new();
        }

        let target = (self.sample_dim as usize) * (self.sample_dim as usize);
        let stride = (total / target).max(1);

        (0..total)
            .step_by(stride)
            .map(|i| {
                let p = &frame.pixels[i * 3..i * 3 + 3];
                [p[0] as f64, p[1] as f64, p[2] as f64]
            })
            .collect()
    }
}

impl ColorClusterer for KMeansClusterer {
    fn cluster(&self, frame: &Frame, k: usize) -> Vec<String> {
        let pixels = self.sample_pixels(frame);
        if pixels.is_empty() || k == 0 {
            return Vec::new();
        }

        let k = k.min(pixels.len());

        // Seed centroids from evenly spaced pixels
        let mut centroids: Vec<[f64; 3]> = (0..k)
            .map(|i| pixels[i * pixels.len() / k])
            .collect();

        let mut assignments = vec![0usize; pixels.len()];

        for _ in 0..self.max_iterations {
            let mut changed = false;
            for (i, px) in pixels.iter().enumerate() {
                let nearest = nearest_centroid(px, &centroids);
                if assignments[i] != nearest {
                    assignments[i] = nearest;
                    changed = true;
                }
            }

            let mut sums = vec![[0.0f64; 3]; k];
            let mut counts = vec![0usize; k];
            for (px, &a) in pixels.iter().zip(assignments.iter()) {
                for c in 0..3 {
                    sums[a][c] += px[c];
                }
                counts[a] += 1;
            }
            for (c, centroid) in centroids.iter_mut().enumerate() {
                if counts[c] > 0 {
                    for ch in 0..3 {
                        centroid[ch] = sums[c][ch] / counts[c] as f64;
                    }
                }
            }

            if !changed {
                break;
            }
        }

        // Largest cluster first
        let mut counts = vec![0usize; k];
        for &a in &assignments {
            counts[a] += 1;
        }
        let mut order: Vec<usize> = (0..k).collect();
        order.sort_by(|&a, &b| counts[b].cmp(&counts[a]));

        order
            .into_iter()
            .map(|c| {
                format!(
                    "#{:02x}{:02x}{:02x}",
                    centroids[c][0].round().clamp(0.0, 255.0) as u8,
                    centroids[c][1].round().clamp(0.0, 255.0) as u8,
                    centroids[c][2].round().clamp(0.0, 255.0) as u8
                )
            })
            .collect()
    }
}

fn nearest_centroid(px: &[f64; 3], centroids: &[[f64; 3]]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::MAX;
    for (i, c) in centroids.iter().enumerate() {
        let dist = (px[0] - c[0]).powi(2) + (px[1] - c[1]).powi(2) + (px[2] - c[2]).powi(2);
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn clusterer() -> KMeansClusterer {
        KMeansClusterer::new(&Config::default().colors)
    }

    #[test]
    fn test_solid_frame_yields_its_color() {
        let frame = Frame::filled(32, 32, [255, 0, 0]);
        let palette = clusterer().cluster(&frame, 3);
        assert!(!palette.is_empty());
        assert_eq!(palette[0], "#ff0000");
    }

    #[test]
    fn test_palette_is_deterministic() {
        let mut pixels = Vec::new();
        for i in 0..(16 * 16) {
            let v = (i % 256) as u8;
            pixels.extend_from_slice(&[v, 255 - v, 128]);
        }
        let frame = Frame::new(16, 16, pixels);

        let a = clusterer().cluster(&frame, 5);
        let b = clusterer().cluster(&frame, 5);
        assert_eq!(a, b);
        assert_eq!(a.len(), 5);
        for color in &a {
            assert!(color.starts_with('#') && color.len() == 7);
        }
    }

    #[test]
    fn test_empty_frame_yields_empty_palette() {
        let frame = Frame::new(0, 0, Vec::new());
        assert!(clusterer().cluster(&frame, 5).is_empty());
    }
}
