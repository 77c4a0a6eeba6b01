use crate::analysis::{CaptionSegment, SceneRecord};
use crate::config::CaptionConfig;

/// Build the caption track from the scene sequence.
///
/// Each scene yields one segment starting at the scene's time and ending
/// where the next scene starts; the final segment ends at the video duration.
/// Segments are therefore contiguous and non-overlapping. Text is the scene
/// description, augmented with up to two primary objects, hard-capped at the
/// configured character limit.
pub fn synthesize(
    scenes: &[SceneRecord],
    duration: f64,
    config: &CaptionConfig,
) -> Vec<CaptionSegment> {
    let mut captions = Vec::with_capacity(scenes.len());

    for (i, scene) in scenes.iter().enumerate() {
        let start = scene.time_seconds;
        let end = scenes
            .get(i + 1)
            .map(|next| next.time_seconds)
            .unwrap_or(duration);

        let mut text = scene.description.clone();
        if !scene.primary_objects.is_empty() {
            let shown: Vec<&str> = scene
                .primary_objects
                .iter()
                .take(config.showing_objects)
                .map(|s| s.as_str())
                .collect();
            text = format!("{} (Showing: {})", text, shown.join(", "));
        }

        captions.push(CaptionSegment {
            start,
            end: end.min(duration),
            text: truncate_chars(&text, config.max_text_chars),
        });
    }

    captions
}

/// Hard cap: excess characters are dropped, not word-wrapped.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn scene(time_seconds: f64, description: &str, primary: &[&str]) -> SceneRecord {
        SceneRecord {
            timestamp: crate::analysis::format_timestamp(time_seconds),
            time_seconds,
            description: description.to_string(),
            objects: primary.len(),
            primary_objects: primary.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_segments_are_contiguous_and_end_at_duration() {
        let config = Config::default().captions;
        let scenes = vec![
            scene(0.0, "intro", &[]),
            scene(2.0, "middle", &[]),
            scene(4.0, "ending", &[]),
        ];

        let captions = synthesize(&scenes, 5.5, &config);

        assert_eq!(captions.len(), 3);
        for pair in captions.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(captions.last().unwrap().end, 5.5);
    }

    #[test]
    fn test_primary_objects_appended_to_text() {
        let config = Config::default().captions;
        let scenes = vec![scene(0.0, "a dog in a park", &["dog", "tree", "bench"])];

        let captions = synthesize(&scenes, 2.0, &config);

        // Only the first two primary objects are shown
        assert_eq!(captions[0].text, "a dog in a park (Showing: dog, tree)");
    }

    #[test]
    fn test_text_hard_capped_at_limit() {
        let config = Config::default().captions;
        let long = "x".repeat(300);
        let scenes = vec![scene(0.0, &long, &[])];

        let captions = synthesize(&scenes, 2.0, &config);

        assert_eq!(captions[0].text.chars().count(), config.max_text_chars);
    }

    #[test]
    fn test_end_clamped_to_duration() {
        let config = Config::default().captions;
        // Last scene starts past the reported duration (rounding drift)
        let scenes = vec![scene(0.0, "a", &[]), scene(2.0, "b", &[])];

        let captions = synthesize(&scenes, 1.5, &config);

        assert_eq!(captions[1].end, 1.5);
    }

    #[test]
    fn test_no_scenes_yield_empty_track() {
        let config = Config::default().captions;
        assert!(synthesize(&[], 10.0, &config).is_empty());
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let text = "é".repeat(150);
        let out = truncate_chars(&text, 100);
        assert_eq!(out.chars().count(), 100);
    }
}
