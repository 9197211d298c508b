//! Panels: one narrative beat of a page.

use image::RgbImage;

use crate::geometry::BoundingBox;
use crate::model::entity::Entity;
use crate::model::speech_bubble::SpeechBubble;

/// A sub-region of a page holding the entities and speech bubbles
/// assigned to it. A panel's identity within its page is positional
/// (its index after ordering), not a stored id.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub description: String,
    pub bounding_box: BoundingBox,
    /// Index of the owning page. Relation only, not ownership.
    pub page_id: u32,
    /// Scene grouping key; 0 = ungrouped.
    pub scene_id: i32,
    /// Marks the first panel of a scene.
    pub starting_tag: bool,
    pub entities: Vec<Entity>,
    pub speech_bubbles: Vec<SpeechBubble>,
    pub image: Option<RgbImage>,
}

impl Panel {
    pub fn new(description: impl Into<String>, bounding_box: BoundingBox) -> Self {
        Self {
            description: description.into(),
            bounding_box,
            page_id: 0,
            scene_id: 0,
            starting_tag: false,
            entities: Vec::new(),
            speech_bubbles: Vec::new(),
            image: None,
        }
    }

    /// Resolves a bubble's speaker indices against this panel's entity
    /// list, skipping indices that no longer point at anything.
    pub fn speakers_of<'a>(&'a self, bubble: &SpeechBubble) -> Vec<&'a Entity> {
        bubble
            .speakers
            .iter()
            .filter_map(|&i| self.entities.get(i))
            .collect()
    }

    /// Numbered transcript of the panel's speech bubbles.
    pub fn transcript(&self) -> String {
        let mut transcript = String::new();
        for (i, bubble) in self.speech_bubbles.iter().enumerate() {
            transcript.push_str(&format!("Speech Bubble {}: {}\n", i + 1, bubble.text));
        }
        transcript.push('\n');
        transcript
    }
}
