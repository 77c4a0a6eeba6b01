use crate::models::Detection;
use std::collections::{BTreeSet, HashMap};

/// Running state across samples: cumulative label frequencies, the previous
/// sample's label set, and the transition log. Owned by one pipeline run and
/// discarded with it.
#[derive(Debug, Default)]
pub struct SceneTracker {
    object_frequency: HashMap<String, u32>,
    /// Labels in the order they were first seen, for stable frequency ties
    first_seen: Vec<String>,
    previous_objects: BTreeSet<String>,
    transitions: Vec<String>,
}

impl SceneTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one frame's retained detections into the tracker. Every label
    /// increments its frequency; the label set is compared against the
    /// immediately preceding sample's set to detect a transition. Returns the
    /// transition description, if one was recorded.
    ///
    /// The first observed sample never produces a transition: there is no
    /// prior state to compare against.
    pub fn observe(&mut self, detections: &[Detection], max_named_labels: usize) -> Option<String> {
        let current: BTreeSet<String> = detections.iter().map(|d| d.label.clone()).collect();

        for detection in detections {
            if !self.object_frequency.contains_key(&detection.label) {
                self.first_seen.push(detection.label.clone());
            }
            *self.object_frequency.entry(detection.label.clone()).or_insert(0) += 1;
        }

        let transition = detect_transition(&self.previous_objects, &current, max_named_labels);
        if let Some(text) = &transition {
            self.transitions.push(text.clone());
        }

        self.previous_objects = current;
        transition
    }

    /// Labels ranked by descending frequency; ties keep first-seen order.
    pub fn ranked_labels(&self) -> Vec<(String, u32)> {
        let mut ranked: Vec<(String, u32)> = self
            .first_seen
            .iter()
            .map(|label| (label.clone(), self.object_frequency[label]))
            .collect();
        // Stable sort preserves first-seen order within equal counts
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    pub fn object_frequency(&self) -> &HashMap<String, u32> {
        &self.object_frequency
    }

    pub fn transitions(&self) -> &[String] {
        &self.transitions
    }
}

/// Pure transition check over two consecutive label sets.
///
/// A transition is a change in the recognized label set; it is only reported
/// when the previous set is non-empty. Up to `max_named_labels` newly
/// appeared labels are named in the description.
pub fn detect_transition(
    previous: &BTreeSet<String>,
    current: &BTreeSet<String>,
    max_named_labels: usize,
) -> Option<String> {
    if previous.is_empty() {
        return None;
    }

    let new: Vec<&String> = current.difference(previous).collect();
    let removed = previous.difference(current).count();

    if new.is_empty() && removed == 0 {
        return None;
    }

    let mut text = String::from("Scene transition detected");
    if !new.is_empty() {
        let named: Vec<&str> = new
            .iter()
            .take(max_named_labels)
            .map(|s| s.as_str())
            .collect();
        text.push_str(&format!(" - New: {}", named.join(", ")));
    }
    Some(text)
}
