use super::analyzer::FrameAnalysis;
use super::tracker::SceneTracker;
use crate::analysis::{format_timestamp, round1, AnalysisResult, SceneRecord};
use crate::config::SummaryConfig;
use crate::frame::SampleFrame;
use std::collections::BTreeMap;

/// Folds per-frame analyses into the ordered scene sequence, then renders the
/// final summary and statistics.
pub struct SceneAggregator {
    scenes: Vec<SceneRecord>,
    config: SummaryConfig,
}

impl SceneAggregator {
    pub fn new(config: SummaryConfig) -> Self {
        Self {
            scenes: Vec::new(),
            config,
        }
    }

    /// Record one scene. Samples arrive in strictly increasing index order,
    /// so the scene sequence stays ordered by construction.
    pub fn push(&mut self, sample: &SampleFrame, analysis: &FrameAnalysis) {
        self.scenes.push(SceneRecord {
            timestamp: format_timestamp(sample.timestamp_seconds),
            time_seconds: round1(sample.timestamp_seconds),
            description: analysis.description.clone(),
            objects: analysis.detections.len(),
            primary_objects: analysis
                .detections
                .iter()
                .take(self.config.primary_objects)
                .map(|d| d.label.clone())
                .collect(),
        });
    }

    pub fn scenes(&self) -> &[SceneRecord] {
        &self.scenes
    }

    /// Render the final result from the accumulated scenes and tracker state.
    pub fn finish(
        self,
        tracker: &SceneTracker,
        captions: Vec<crate::analysis::CaptionSegment>,
        duration: f64,
        fps: f64,
        total_frames: u64,
    ) -> AnalysisResult {
        let ranked = tracker.ranked_labels();

        let summary = render_summary(
            &self.scenes,
            &ranked,
            tracker.transitions().len(),
            duration,
            &self.config,
        );

        let objects_detected: Vec<String> = ranked
            .iter()
            .take(self.config.top_objects)
            .map(|(label, _)| label.clone())
            .collect();

        let object_frequencies: BTreeMap<String, u32> = tracker
            .object_frequency()
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();

        let average_objects_per_scene = if self.scenes.is_empty() {
            0.0
        } else {
            let total: usize = self.scenes.iter().map(|s| s.objects).sum();
            round1(total as f64 / self.scenes.len() as f64)
        };

        AnalysisResult {
            summary,
            scenes: self.scenes,
            captions,
            duration,
            fps,
            total_frames,
            objects_detected,
            object_frequencies,
            scene_transitions: tracker.transitions().len(),
            average_objects_per_scene,
            analyzed_at: chrono::Utc::now(),
        }
    }
}

fn render_summary(
    scenes: &[SceneRecord],
    ranked: &[(String, u32)],
    transition_count: usize,
    duration: f64,
    config: &SummaryConfig,
) -> String {
    if scenes.is_empty() {
        return "No video content could be analyzed.".to_string();
    }

    let mut summary = format!(
        "Video analysis complete: {} scenes analyzed over {:.1} seconds. ",
        scenes.len(),
        duration
    );

    if !ranked.is_empty() {
        let featured: Vec<&str> = ranked
            .iter()
            .take(config.summary_objects)
            .map(|(label, _)| label.as_str())
            .collect();
        summary.push_str(&format!(
            "The video primarily features: {}. ",
            featured.join(", ")
        ));
    }

    if transition_count > 0 {
        summary.push_str(&format!(
            "Detected {} scene transitions and activity changes.",
            transition_count
        ));
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::frame::Frame;
    use crate::models::Detection;

    fn sample(index: u64, timestamp: f64) -> SampleFrame {
        SampleFrame {
            index,
            timestamp_seconds: timestamp,
            frame: Frame::filled(2, 2, [0, 0, 0]),
        }
    }

    fn analysis(description: &str, labels: &[&str]) -> FrameAnalysis {
        FrameAnalysis {
            description: description.to_string(),
            detections: labels
                .iter()
                .enumerate()
                .map(|(i, l)| Detection::new(*l, 0.9 - i as f64 * 0.05, [0.0, 0.0, 1.0, 1.0]))
                .collect(),
        }
    }

    #[test]
    fn test_scene_records_are_ordered_and_shaped() {
        let config = Config::default().summary;
        let mut aggregator = SceneAggregator::new(config);
        let mut tracker = SceneTracker::new();

        let frames = [
            (sample(0, 0.0), analysis("a dog runs", &["dog", "ball", "tree", "person"])),
            (sample(60, 2.0), analysis("a dog sits", &["dog"])),
        ];
        for (s, a) in &frames {
            tracker.observe(&a.detections, 3);
            aggregator.push(s, a);
        }

        let result = aggregator.finish(&tracker, Vec::new(), 4.0, 30.0, 120);

        assert_eq!(result.scenes.len(), 2);
        assert_eq!(result.scenes[0].timestamp, "0:00");
        assert_eq!(result.scenes[0].primary_objects, vec!["dog", "ball", "tree"]);
        assert_eq!(result.scenes[0].objects, 4);
        assert!(result.scenes[0].time_seconds < result.scenes[1].time_seconds);
        // (4 + 1) / 2 = 2.5
        assert_eq!(result.average_objects_per_scene, 2.5);
    }

    #[test]
    fn test_summary_mentions_scenes_objects_and_transitions() {
        let config = Config::default().summary;
        let mut aggregator = SceneAggregator::new(config);
        let mut tracker = SceneTracker::new();

        let frames = [
            (sample(0, 0.0), analysis("first", &["dog"])),
            (sample(60, 2.0), analysis("second", &["cat"])),
        ];
        for (s, a) in &frames {
            tracker.observe(&a.detections, 3);
            aggregator.push(s, a);
        }

        let result = aggregator.finish(&tracker, Vec::new(), 4.0, 30.0, 120);

        assert!(result.summary.contains("2 scenes analyzed over 4.0 seconds"));
        assert!(result.summary.contains("primarily features: dog, cat"));
        assert!(result.summary.contains("Detected 1 scene transitions"));
        assert_eq!(result.scene_transitions, 1);
    }

    #[test]
    fn test_empty_run_reports_no_content() {
        let config = Config::default().summary;
        let aggregator = SceneAggregator::new(config);
        let tracker = SceneTracker::new();

        let result = aggregator.finish(&tracker, Vec::new(), 0.0, 0.0, 0);

        assert_eq!(result.summary, "No video content could be analyzed.");
        assert!(result.scenes.is_empty());
        assert_eq!(result.average_objects_per_scene, 0.0);
    }

    #[test]
    fn test_frequencies_sum_over_all_occurrences() {
        let config = Config::default().summary;
        let mut aggregator = SceneAggregator::new(config);
        let mut tracker = SceneTracker::new();

        let frames = [
            (sample(0, 0.0), analysis("first", &["dog", "ball"])),
            (sample(60, 2.0), analysis("second", &["dog", "cat"])),
        ];
        for (s, a) in &frames {
            tracker.observe(&a.detections, 3);
            aggregator.push(s, a);
        }

        let result = aggregator.finish(&tracker, Vec::new(), 4.0, 30.0, 120);

        let total: u32 = result.object_frequencies.values().sum();
        let occurrences: usize = result.scenes.iter().map(|s| s.objects).sum();
        assert_eq!(total as usize, occurrences);
        assert_eq!(result.objects_detected[0], "dog");
    }
}
