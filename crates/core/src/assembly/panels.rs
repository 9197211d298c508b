//! Panel assembly: raw panel boxes to ordered Panel nodes.

use crate::assembly::{AssemblyParams, detection_bbox};
use crate::error::Result;
use crate::geometry::Corners;
use crate::model::{Page, Panel};

/// Builds the page's panel list from raw corner boxes, ordered by
/// reading sequence, replacing any prior content.
///
/// Reading order is approximated by bucketing panels into horizontal
/// rows of `y_tolerance` pixels (`floor(y / tolerance)`) and sorting by
/// `(row, x)` ascending: left to right, top to bottom, robust to small
/// vertical misalignment within a row. The sort is stable, so panels
/// with an identical key keep their input order.
pub fn assemble_panels(raw: &[Corners], page: &mut Page, params: &AssemblyParams) -> Result<()> {
    let mut panels = Vec::with_capacity(raw.len());
    for &corners in raw {
        let bbox = detection_bbox(corners)?;
        let mut panel = Panel::new("", bbox);
        panel.page_id = page.index;
        panels.push(panel);
    }

    panels.sort_by(|a, b| {
        let row_a = (a.bounding_box.y / params.y_tolerance).floor();
        let row_b = (b.bounding_box.y / params.y_tolerance).floor();
        row_a
            .partial_cmp(&row_b)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(
                a.bounding_box
                    .x
                    .partial_cmp(&b.bounding_box.x)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
    });

    page.panels = panels;
    Ok(())
}
