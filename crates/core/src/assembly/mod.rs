//! Structure assembly: raw per-page detections to ordered tree nodes.
//!
//! Panel assembly runs first (assignment needs panels to exist);
//! entity and speech-bubble assignment then run independently against
//! the assembled panels. Pages are mutually independent throughout, so
//! the reader may fan them out across threads as long as the final
//! aggregation keeps input order.

mod bubbles;
mod entities;
mod panels;
mod params;
mod reader;

pub use bubbles::assign_speech_bubbles;
pub use entities::assign_entities;
pub use panels::assemble_panels;
pub use params::AssemblyParams;
pub use reader::{
    ComicReader, Detections, IngestStats, ObjectDetector, assemble_page, build_comic,
    build_comic_with_stats, pair_pages,
};

use std::cmp::Ordering;

use crate::error::{ComicError, Result};
use crate::geometry::{BoundingBox, Corners};

/// Per-kind outcome of an assignment pass. Dropped and deduplicated
/// detections are counted rather than silently discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssignOutcome {
    pub attached: usize,
    pub dropped: usize,
    pub deduplicated: usize,
}

impl AssignOutcome {
    pub fn absorb(&mut self, other: AssignOutcome) {
        self.attached += other.attached;
        self.dropped += other.dropped;
        self.deduplicated += other.deduplicated;
    }
}

/// Converts a raw corner box, rejecting malformed detections at the
/// boundary instead of letting them into the tree.
pub(crate) fn detection_bbox(corners: Corners) -> Result<BoundingBox> {
    let bbox = BoundingBox::from_corners(corners);
    if bbox.is_valid_detection() {
        Ok(bbox)
    } else {
        let (x1, y1, x2, y2) = corners;
        Err(ComicError::InvalidBox { x1, y1, x2, y2 })
    }
}

/// Intra-panel ordering key shared by entities and speech bubbles:
/// `(y - height, x - width)` ascending.
///
/// Not a true top-left coordinate (likely the intent was `(y, x)`), but
/// it is the behavior previously exported documents were ordered by, so
/// it is kept verbatim.
pub(crate) fn size_offset_order(a: &BoundingBox, b: &BoundingBox) -> Ordering {
    let ka = (a.y - a.height, a.x - a.width);
    let kb = (b.y - b.height, b.x - b.width);
    ka.0.partial_cmp(&kb.0)
        .unwrap_or(Ordering::Equal)
        .then(ka.1.partial_cmp(&kb.1).unwrap_or(Ordering::Equal))
}
