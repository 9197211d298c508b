//! Structure assembly parameters.

/// Parameters controlling how raw detections are assembled into the
/// document tree.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyParams {
    /// Panels whose top edges differ by less than this many pixels are
    /// treated as one horizontal row when computing reading order.
    pub y_tolerance: f64,

    /// Two entities assigned to the same panel with more IoU than this
    /// are considered duplicate detections of the same character; the
    /// first one encountered wins.
    pub entity_dedup_iou: f64,
}

impl Default for AssemblyParams {
    fn default() -> Self {
        Self {
            y_tolerance: 50.0,
            entity_dedup_iou: 0.6,
        }
    }
}

impl AssemblyParams {
    /// Creates new assembly parameters with the specified values.
    ///
    /// # Panics
    /// Panics if `y_tolerance` is not positive or `entity_dedup_iou` is
    /// outside `[0, 1]`.
    pub fn new(y_tolerance: f64, entity_dedup_iou: f64) -> Self {
        assert!(y_tolerance > 0.0, "y_tolerance must be positive");
        assert!(
            (0.0..=1.0).contains(&entity_dedup_iou),
            "entity_dedup_iou must be between 0 and 1"
        );
        Self {
            y_tolerance,
            entity_dedup_iou,
        }
    }
}
