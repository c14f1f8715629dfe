//! Axis-aligned rectangles in page pixel coordinates.
//!
//! A `Rect` is always a measurement: it is derived from a row's committed style
//! at query time and goes stale as soon as that style changes.

use serde::{Deserialize, Serialize};

/// Bounding box `{x1, y1, x2, y2}`; `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Rect {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Builds a rect from an origin and a size.
    pub fn from_origin(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// True when the open horizontal spans intersect (touching edges do not count).
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        other.x1 < self.x2 && other.x2 > self.x1
    }

    /// True when the open vertical spans intersect.
    pub fn overlaps_y(&self, other: &Rect) -> bool {
        other.y1 < self.y2 && other.y2 > self.y1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_origin_extents() {
        let r = Rect::from_origin(10.0, 20.0, 100.0, 15.0);
        assert_eq!(r, Rect::new(10.0, 20.0, 110.0, 35.0));
        assert_eq!(r.width(), 100.0);
        assert_eq!(r.height(), 15.0);
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 50.0, 10.0);
        let b = Rect::new(50.0, 0.0, 80.0, 10.0);
        assert!(!a.overlaps_x(&b));
        assert!(a.overlaps_y(&b));
    }

    #[test]
    fn test_partial_overlap_both_axes() {
        let a = Rect::new(0.0, 0.0, 50.0, 10.0);
        let b = Rect::new(40.0, 5.0, 80.0, 30.0);
        assert!(a.overlaps_x(&b));
        assert!(b.overlaps_x(&a));
        assert!(a.overlaps_y(&b));
    }
}
