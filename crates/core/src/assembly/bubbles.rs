//! Speech-bubble assignment: attaching detected text regions to panels.

use itertools::izip;
use tracing::debug;

use crate::assembly::{AssemblyParams, AssignOutcome, detection_bbox, size_offset_order};
use crate::error::{ComicError, Result};
use crate::geometry::Corners;
use crate::model::{Page, SpeechBubble, SpeechBubbleKind};

/// Working label given to every bubble during assembly. Kept alongside
/// the `kind` enumeration because exported documents carry it.
const ASSEMBLY_LABEL: &str = "dialogue";

/// Attaches each detected speech bubble to the panel that covers the
/// largest share of it, then orders every panel's bubble list.
///
/// A bubble is owned by the panel maximizing `overlap_ratio(bubble,
/// panel)`; with no positive overlap the bubble is dropped (counted).
/// Unlike entities there is no deduplication. `is_essential_text` runs
/// parallel to `raw` and drives the placeholder speaker slot: essential
/// bubbles get `speaker_id` 1, the rest 0. Actual speaker-entity
/// linking is left to external callers.
pub fn assign_speech_bubbles(
    raw: &[Corners],
    is_essential_text: &[bool],
    page: &mut Page,
    _params: &AssemblyParams,
) -> Result<AssignOutcome> {
    if raw.len() != is_essential_text.len() {
        return Err(ComicError::MismatchedArrays {
            what: "speech bubbles",
            boxes: raw.len(),
            labels: is_essential_text.len(),
        });
    }

    let mut outcome = AssignOutcome::default();

    for (&corners, &essential) in izip!(raw, is_essential_text) {
        let mut bubble = SpeechBubble::new(SpeechBubbleKind::Speech, "", detection_bbox(corners)?);
        bubble.label = ASSEMBLY_LABEL.to_string();
        bubble.speaker_id = if essential { 1 } else { 0 };

        let mut best: Option<usize> = None;
        let mut max_overlap = 0.0;
        for (i, panel) in page.panels.iter().enumerate() {
            let overlap = bubble.bounding_box.overlap_ratio(&panel.bounding_box);
            if overlap > max_overlap {
                max_overlap = overlap;
                best = Some(i);
            }
        }

        match best {
            Some(i) => {
                page.panels[i].speech_bubbles.push(bubble);
                outcome.attached += 1;
            }
            None => outcome.dropped += 1,
        }
    }

    for panel in &mut page.panels {
        panel
            .speech_bubbles
            .sort_by(|a, b| size_offset_order(&a.bounding_box, &b.bounding_box));
    }

    debug!(
        page = page.index,
        attached = outcome.attached,
        dropped = outcome.dropped,
        "assigned speech bubbles"
    );
    Ok(outcome)
}
