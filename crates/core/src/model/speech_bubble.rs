//! Detected text regions and their semantic categories.

use image::RgbImage;

use crate::geometry::BoundingBox;

/// Semantic category of a speech bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeechBubbleKind {
    Narrator,
    #[default]
    Speech,
    Thoughts,
    Effect,
    Shout,
}

impl SpeechBubbleKind {
    /// Best-effort mapping from a free-form label. The label vocabulary
    /// is open (unlike page types), so unknown labels fall back to
    /// `Speech` instead of failing.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "narrator" => Self::Narrator,
            "thoughts" => Self::Thoughts,
            "effect" => Self::Effect,
            "shout" => Self::Shout,
            _ => Self::Speech,
        }
    }
}

/// A detected text region, owned by exactly one panel.
///
/// `kind` is the semantic category; `label` is the free-form working
/// label that actually travels on the wire (`Type` element). Both are
/// kept so previously exported documents stay readable.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechBubble {
    pub kind: SpeechBubbleKind,
    pub label: String,
    /// Raw text; may be empty until OCR fills it in.
    pub text: String,
    pub bounding_box: BoundingBox,
    /// Placeholder speaker slot: 1 = essential, 0 = unassigned.
    pub speaker_id: i32,
    /// Indices into the owning panel's entity list. Relation only;
    /// resolve through [`Panel::speakers_of`](crate::model::Panel::speakers_of).
    pub speakers: Vec<usize>,
    pub image: Option<RgbImage>,
}

impl SpeechBubble {
    pub fn new(kind: SpeechBubbleKind, text: impl Into<String>, bounding_box: BoundingBox) -> Self {
        Self {
            kind,
            label: String::new(),
            text: text.into(),
            bounding_box,
            speaker_id: 0,
            speakers: Vec::new(),
            image: None,
        }
    }

    /// One script line: `"{speaker_id}: {text}"`.
    pub fn line(&self) -> String {
        format!("{}: {}", self.speaker_id, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_label() {
        assert_eq!(SpeechBubbleKind::from_label("NARRATOR"), SpeechBubbleKind::Narrator);
        assert_eq!(SpeechBubbleKind::from_label(" shout "), SpeechBubbleKind::Shout);
        // Open vocabulary: the transitional assembly label and anything
        // unknown both map to the default.
        assert_eq!(SpeechBubbleKind::from_label("dialogue"), SpeechBubbleKind::Speech);
        assert_eq!(SpeechBubbleKind::from_label("banner"), SpeechBubbleKind::Speech);
    }
}
