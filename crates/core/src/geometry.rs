//! Axis-aligned bounding boxes and the geometric predicates used by
//! structure assembly.
//!
//! All coordinates are page pixels. Boxes are `(x, y, width, height)`
//! with the origin at the top-left corner of the page. A box may carry
//! a detector confidence and arbitrary pass-through keys; both travel
//! with the box through serialization untouched.

use indexmap::IndexMap;

/// Raw detector output: a box in `(x1, y1, x2, y2)` corner form.
pub type Corners = (f64, f64, f64, f64);

/// An axis-aligned bounding box in page-pixel coordinates.
///
/// `extra` holds pass-through keys from imported documents in their
/// original insertion order; the serializer writes them back verbatim.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub confidence: Option<f64>,
    pub extra: IndexMap<String, String>,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            confidence: None,
            extra: IndexMap::new(),
        }
    }

    /// Converts a `(x1, y1, x2, y2)` corner box to xywh form.
    ///
    /// No validation is performed; a caller handing in `x2 < x1` gets a
    /// negative width back, not a correction.
    pub fn from_corners(corners: Corners) -> Self {
        let (x1, y1, x2, y2) = corners;
        Self::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Right edge.
    pub fn x1(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn y1(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// True if the box describes a usable detection: finite coordinates
    /// and strictly positive extent.
    pub fn is_valid_detection(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Intersection-over-union with another box, in `[0, 1]`.
    ///
    /// Intersection extent is clamped to zero; a zero union area yields
    /// 0 rather than an error.
    pub fn iou(&self, other: &BoundingBox) -> f64 {
        let ix = self.x.max(other.x);
        let iy = self.y.max(other.y);
        let ix1 = self.x1().min(other.x1());
        let iy1 = self.y1().min(other.y1());

        let inter = (ix1 - ix).max(0.0) * (iy1 - iy).max(0.0);
        let union = self.area() + other.area() - inter;

        if union > 0.0 { inter / union } else { 0.0 }
    }

    /// Intersection area divided by the area of `self`.
    ///
    /// Asymmetric on purpose: answers "how much of `self` lies inside
    /// `other`". Returns 0.0 when the boxes do not strictly overlap.
    pub fn overlap_ratio(&self, other: &BoundingBox) -> f64 {
        let ix = self.x.max(other.x);
        let iy = self.y.max(other.y);
        let ix1 = self.x1().min(other.x1());
        let iy1 = self.y1().min(other.y1());

        if ix < ix1 && iy < iy1 {
            ((ix1 - ix) * (iy1 - iy)) / self.area()
        } else {
            0.0
        }
    }

    /// True if the two boxes overlap after each is inflated by its own
    /// width/height on every side, or if `self`'s inflated range fully
    /// contains `other`'s.
    ///
    /// The margin is deliberately the box's own size, not a fixed pixel
    /// count; near-miss detections are meant to count as overlapping.
    pub fn overlaps_or_contains(&self, other: &BoundingBox) -> bool {
        let a_left = self.x - self.width;
        let a_right = self.x + self.width;
        let a_top = self.y - self.height;
        let a_bottom = self.y + self.height;

        let b_left = other.x - other.width;
        let b_right = other.x + other.width;
        let b_top = other.y - other.height;
        let b_bottom = other.y + other.height;

        let overlap =
            b_left < a_right && b_right > a_left && b_top < a_bottom && b_bottom > a_top;

        let contains =
            a_left <= b_left && a_right >= b_right && a_top <= b_top && a_bottom >= b_bottom;

        overlap || contains
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(x: f64, y: f64, w: f64, h: f64) -> BoundingBox {
        BoundingBox::new(x, y, w, h)
    }

    #[test]
    fn test_from_corners() {
        let b = BoundingBox::from_corners((10.0, 20.0, 110.0, 70.0));
        assert_eq!((b.x, b.y, b.width, b.height), (10.0, 20.0, 100.0, 50.0));
    }

    #[test]
    fn test_from_corners_keeps_negative_extent() {
        // Caller error is propagated, not corrected.
        let b = BoundingBox::from_corners((10.0, 0.0, 5.0, 5.0));
        assert_eq!(b.width, -5.0);
        assert!(!b.is_valid_detection());
    }

    #[test]
    fn test_iou_identity_and_symmetry() {
        let a = bbox(0.0, 0.0, 10.0, 10.0);
        let b = bbox(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.iou(&a), 1.0);
        assert_eq!(a.iou(&b), b.iou(&a));
        assert!(a.iou(&b) > 0.0 && a.iou(&b) < 1.0);
    }

    #[test]
    fn test_iou_disjoint_and_zero_union() {
        let a = bbox(0.0, 0.0, 10.0, 10.0);
        let b = bbox(20.0, 20.0, 10.0, 10.0);
        assert_eq!(a.iou(&b), 0.0);

        let empty = bbox(0.0, 0.0, 0.0, 0.0);
        assert_eq!(empty.iou(&empty), 0.0);
    }

    #[test]
    fn test_overlap_ratio_is_asymmetric() {
        let small = bbox(0.0, 0.0, 10.0, 10.0);
        let big = bbox(0.0, 0.0, 100.0, 100.0);
        assert_eq!(small.overlap_ratio(&big), 1.0);
        assert_eq!(big.overlap_ratio(&small), 0.01);
    }

    #[test]
    fn test_overlap_ratio_disjoint() {
        let a = bbox(0.0, 0.0, 10.0, 10.0);
        let b = bbox(50.0, 50.0, 10.0, 10.0);
        assert_eq!(a.overlap_ratio(&b), 0.0);
    }

    #[test]
    fn test_overlaps_or_contains_uses_inflated_ranges() {
        // Raw boxes are 10 apart but each inflated range reaches the
        // other, so the margin test reports an overlap.
        let a = bbox(0.0, 0.0, 20.0, 20.0);
        let b = bbox(30.0, 0.0, 20.0, 20.0);
        assert!(a.overlaps_or_contains(&b));

        // Far beyond the inflation margin.
        let c = bbox(200.0, 200.0, 20.0, 20.0);
        assert!(!a.overlaps_or_contains(&c));
    }

    #[test]
    fn test_overlaps_or_contains_containment() {
        let outer = bbox(0.0, 0.0, 100.0, 100.0);
        let inner = bbox(40.0, 40.0, 5.0, 5.0);
        assert!(outer.overlaps_or_contains(&inner));
    }
}
