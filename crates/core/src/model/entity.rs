//! Detected character/object instances.

use image::RgbImage;

use crate::geometry::BoundingBox;

/// Wire value for the entity `Name` element until a naming system
/// exists; parsers ignore it.
pub const ENTITY_NAME_PLACEHOLDER: &str = "Placeholder";

/// A detected character or object instance, owned by exactly one panel
/// after assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub bounding_box: BoundingBox,
    /// Identity key grouping the same character across detections.
    /// 0 means unassigned.
    pub cluster_id: i32,
    /// Ordered `(label, confidence)` pairs.
    pub tags: Vec<(String, f64)>,
    /// Whether this instance counts as a confirmed occurrence.
    pub active_tag: bool,
    /// Pixel crop of the detection; absent until images are attached.
    pub image: Option<RgbImage>,
}

impl Entity {
    pub fn new(bounding_box: BoundingBox) -> Self {
        Self {
            bounding_box,
            cluster_id: 0,
            tags: Vec::new(),
            active_tag: true,
            image: None,
        }
    }
}
