//! Entity assignment: attaching detected characters to their panels.

use itertools::izip;
use tracing::debug;

use crate::assembly::{AssemblyParams, AssignOutcome, detection_bbox, size_offset_order};
use crate::error::{ComicError, Result};
use crate::geometry::Corners;
use crate::model::{Entity, Page};

/// Attaches each detected entity to the panel it overlaps most (by
/// IoU), then orders every panel's entity list.
///
/// `cluster_labels` runs parallel to `raw`; a length mismatch is a
/// caller contract violation. An entity overlapping no panel is
/// dropped, and a candidate that duplicates an already-attached entity
/// (IoU above `entity_dedup_iou`) is skipped in favor of the earlier
/// one. Both outcomes are counted, not errors.
pub fn assign_entities(
    raw: &[Corners],
    cluster_labels: &[i32],
    page: &mut Page,
    params: &AssemblyParams,
) -> Result<AssignOutcome> {
    if raw.len() != cluster_labels.len() {
        return Err(ComicError::MismatchedArrays {
            what: "entities",
            boxes: raw.len(),
            labels: cluster_labels.len(),
        });
    }

    let mut outcome = AssignOutcome::default();

    for (&corners, &cluster_id) in izip!(raw, cluster_labels) {
        let mut entity = Entity::new(detection_bbox(corners)?);
        entity.cluster_id = cluster_id;

        let mut best: Option<usize> = None;
        let mut highest_iou = 0.0;
        for (i, panel) in page.panels.iter().enumerate() {
            let iou = panel.bounding_box.iou(&entity.bounding_box);
            if iou > highest_iou {
                highest_iou = iou;
                best = Some(i);
            }
        }

        let Some(best) = best else {
            outcome.dropped += 1;
            continue;
        };

        let panel = &mut page.panels[best];
        let duplicate = panel
            .entities
            .iter()
            .any(|e| e.bounding_box.iou(&entity.bounding_box) > params.entity_dedup_iou);
        if duplicate {
            outcome.deduplicated += 1;
        } else {
            panel.entities.push(entity);
            outcome.attached += 1;
        }
    }

    for panel in &mut page.panels {
        panel
            .entities
            .sort_by(|a, b| size_offset_order(&a.bounding_box, &b.bounding_box));
    }

    debug!(
        page = page.index,
        attached = outcome.attached,
        dropped = outcome.dropped,
        deduplicated = outcome.deduplicated,
        "assigned entities"
    );
    Ok(outcome)
}
