//! Neighbour context resolution: the nearest sibling row in each direction.
//!
//! # Candidacy rules
//! - top / bottom: horizontal spans must overlap. `top` is the candidate starting
//!   above the target with the greatest bottom edge; `bottom` is the candidate
//!   starting below it with the smallest top edge. A sibling starting at exactly
//!   the target's top edge is neither.
//! - left / right: vertical spans must overlap and horizontal spans must NOT.
//!   `left` ends before the target starts (greatest right edge), `right` starts
//!   after the target ends (smallest left edge).
//!
//! A missing neighbour is normal; `Bounds` substitutes the page edge for it.

use serde::{Deserialize, Serialize};

use crate::layout::geometry::Rect;

/// Indices (into the page's row list) of the nearest neighbour per direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborContext {
    pub top: Option<usize>,
    pub bottom: Option<usize>,
    pub left: Option<usize>,
    pub right: Option<usize>,
}

/// Resolves the neighbour context of `rects[target]` against every other rect.
///
/// `rects` must be measurements of the rows' currently committed styles.
pub fn resolve_context(target: usize, rects: &[Rect]) -> NeighborContext {
    let row = rects[target];
    let mut ctx = NeighborContext::default();

    for (i, other) in rects.iter().enumerate() {
        if i == target {
            continue;
        }

        if other.overlaps_x(&row) {
            if other.y1 < row.y1 {
                if ctx.top.map_or(true, |t| other.y2 > rects[t].y2) {
                    ctx.top = Some(i);
                }
            } else if other.y1 > row.y1 && ctx.bottom.map_or(true, |b| other.y1 < rects[b].y1) {
                ctx.bottom = Some(i);
            }
        }

        if other.overlaps_y(&row) {
            if other.x2 < row.x1 {
                if ctx.left.map_or(true, |l| other.x2 > rects[l].x2) {
                    ctx.left = Some(i);
                }
            } else if other.x1 > row.x2 && ctx.right.map_or(true, |r| other.x1 < rects[r].x1) {
                ctx.right = Some(i);
            }
        }
    }

    ctx
}

/// The obstruction edge in each direction, falling back to the page edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Bottom edge of whatever is above.
    pub top: f32,
    /// Top edge of whatever is below.
    pub bottom: f32,
    /// Left edge of whatever is to the right.
    pub right: f32,
}

impl Bounds {
    pub fn new(ctx: &NeighborContext, rects: &[Rect], page: &Rect) -> Self {
        Self {
            top: ctx.top.map_or(page.y1, |i| rects[i].y2),
            bottom: ctx.bottom.map_or(page.y2, |i| rects[i].y1),
            right: ctx.right.map_or(page.x2, |i| rects[i].x1),
        }
    }

    /// Free space between the obstruction above and `row`'s top edge.
    pub fn space_above(&self, row: &Rect) -> f32 {
        row.y1 - self.top
    }

    /// Bottom gap; negative means `row` intrudes into the obstruction below.
    pub fn bottom_gap(&self, row: &Rect) -> f32 {
        self.bottom - row.y2
    }

    pub fn space_right(&self, row: &Rect) -> f32 {
        self.right - row.x2
    }
}
