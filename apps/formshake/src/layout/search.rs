//! Cost-minimizing style search: removes a row's bottom overlap as cheaply as possible.
//!
//! # Degradation ladders (walked cheapest first)
//! | Axis        | Ladder                              | Cost per step taken      |
//! |-------------|-------------------------------------|--------------------------|
//! | line height | 1.2, 1.1, 1.0, 0.9                  | +1                       |
//! | widen       | factor 0.0 .. 0.9 of the right gap  | +5                       |
//! | font size   | base px down to the 6px floor       | +5·(k+1)² at step k      |
//! | move up     | shift cap 0, 2, 5, unbounded px     | +0.5                     |
//!
//! The search is a depth-first walk of the product space in that axis order.
//! Each level keeps a running cost seeded from its parent and adds the step cost
//! before trying the step; once the running cost reaches the best feasible cost
//! found so far the level is abandoned, since every step cost is non-negative.
//! The first feasible cap in a (line height, width, font size) group ends the
//! innermost level. Ties go to whichever combination the walk reaches first.

use serde::{Deserialize, Serialize};

use crate::layout::context::Bounds;
use crate::layout::geometry::Rect;
use crate::layout::measure::TextMeasurer;
use crate::layout::row::RowStyle;

// ────────────────────────────────────────────────────────────────────────────
// Ladders
// ────────────────────────────────────────────────────────────────────────────

pub const LINE_HEIGHT_LADDER: [f32; 4] = [1.2, 1.1, 1.0, 0.9];
pub const WIDEN_STEPS: usize = 10;
/// `None` is the unbounded cap.
pub const SHIFT_CAPS: [Option<f32>; 4] = [Some(0.0), Some(2.0), Some(5.0), None];

pub const DEFAULT_MIN_FONT_SIZE: f32 = 6.0;
pub const DEFAULT_COST_CEILING: f32 = 10_000.0;

/// The four search axes, in nesting order (outermost first).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    LineHeight,
    Widen,
    FontSize,
    MoveUp,
}

impl Axis {
    pub const ORDER: [Axis; 4] = [Axis::LineHeight, Axis::Widen, Axis::FontSize, Axis::MoveUp];

    fn next(self) -> Option<Axis> {
        match self {
            Axis::LineHeight => Some(Axis::Widen),
            Axis::Widen => Some(Axis::FontSize),
            Axis::FontSize => Some(Axis::MoveUp),
            Axis::MoveUp => None,
        }
    }

    /// Cost added when the walk takes step `step` (0-based) on this axis.
    pub fn step_cost(self, step: usize) -> f32 {
        match self {
            Axis::LineHeight => 1.0,
            Axis::Widen => 5.0,
            Axis::FontSize => {
                let k = (step + 1) as f32;
                5.0 * k * k
            }
            Axis::MoveUp => 0.5,
        }
    }

    /// Running cost contributed by this axis once it sits at ladder index `index`.
    pub fn cumulative_cost(self, index: usize) -> f32 {
        (0..=index).map(|step| self.step_cost(step)).sum()
    }
}

/// Ladder indices of a candidate, one per axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LadderPosition {
    pub line_height: usize,
    pub widen: usize,
    pub font_size: usize,
    pub move_up: usize,
}

impl LadderPosition {
    pub fn index(&self, axis: Axis) -> usize {
        match axis {
            Axis::LineHeight => self.line_height,
            Axis::Widen => self.widen,
            Axis::FontSize => self.font_size,
            Axis::MoveUp => self.move_up,
        }
    }

    fn set(&mut self, axis: Axis, index: usize) {
        match axis {
            Axis::LineHeight => self.line_height = index,
            Axis::Widen => self.widen = index,
            Axis::FontSize => self.font_size = index,
            Axis::MoveUp => self.move_up = index,
        }
    }

    /// Total cost of this combination.
    pub fn cost(&self) -> f32 {
        Axis::ORDER
            .iter()
            .map(|&axis| axis.cumulative_cost(self.index(axis)))
            .sum()
    }
}

/// One point in the search space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StyleCandidate {
    pub line_height: f32,
    pub widen_factor: f32,
    pub font_size: f32,
    /// Upper bound on the upward shift in px; `None` means unbounded.
    pub max_up_shift: Option<f32>,
}

/// Concrete ladders for one row. Only the font-size ladder depends on the row.
///
/// Font sizes are derived from an integer step index on demand, so the ladder
/// costs nothing to build however large the base size is.
#[derive(Debug, Clone, Copy)]
pub struct Ladders {
    base_font_size: f32,
    font_steps: usize,
}

impl Ladders {
    /// 1px steps from `base_font_size` down to `min_font_size` inclusive. A base
    /// already below the floor is the only entry.
    pub fn new(base_font_size: f32, min_font_size: f32) -> Self {
        let font_steps = if base_font_size > min_font_size {
            (base_font_size - min_font_size).floor() as usize
        } else {
            0
        };
        Self {
            base_font_size,
            font_steps,
        }
    }

    pub fn len(&self, axis: Axis) -> usize {
        match axis {
            Axis::LineHeight => LINE_HEIGHT_LADDER.len(),
            Axis::Widen => WIDEN_STEPS,
            Axis::FontSize => self.font_steps + 1,
            Axis::MoveUp => SHIFT_CAPS.len(),
        }
    }

    pub fn candidate(&self, position: &LadderPosition) -> StyleCandidate {
        StyleCandidate {
            line_height: LINE_HEIGHT_LADDER[position.line_height],
            widen_factor: position.widen as f32 / WIDEN_STEPS as f32,
            font_size: self.base_font_size - position.font_size as f32,
            max_up_shift: SHIFT_CAPS[position.move_up],
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Probe: everything the search knows about the row
// ────────────────────────────────────────────────────────────────────────────

/// Search inputs for a single row, captured from its baseline geometry.
#[derive(Debug, Clone)]
pub struct RowProbe<'a> {
    pub text: &'a str,
    /// Committed style before the search; every candidate is applied on top of it.
    pub base: RowStyle,
    /// Top edge of the obstruction below (neighbour or page bottom).
    pub bottom_limit: f32,
    pub space_above: f32,
    /// Room to the right of the row; widening spends a fraction of it.
    pub right_margin: f32,
}

impl<'a> RowProbe<'a> {
    pub fn new(text: &'a str, base: RowStyle, rect: &Rect, bounds: &Bounds) -> Self {
        Self {
            text,
            base,
            bottom_limit: bounds.bottom,
            space_above: bounds.space_above(rect),
            right_margin: bounds.space_right(rect),
        }
    }

    /// Bottom gap of the row rendered with `style`; negative means overlap.
    pub fn bottom_gap<M: TextMeasurer + ?Sized>(&self, style: &RowStyle, measurer: &M) -> f32 {
        self.bottom_limit - (style.top + measurer.content_height(self.text, style))
    }

    /// The concrete style a candidate produces for this row.
    pub fn apply<M: TextMeasurer + ?Sized>(
        &self,
        candidate: &StyleCandidate,
        measurer: &M,
    ) -> RowStyle {
        let mut style = RowStyle {
            line_height: candidate.line_height,
            width: self.base.width + self.right_margin.max(0.0) * candidate.widen_factor,
            font_size: candidate.font_size,
            top: self.base.top,
        };

        let cap = candidate.max_up_shift.unwrap_or(f32::INFINITY);
        if cap > 0.0 && self.space_above > 0.0 {
            let gap = self.bottom_gap(&style, measurer);
            if gap < 0.0 {
                style.top -= (-gap).min(self.space_above).min(cap);
            }
        }
        style
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Search
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Initial bound; combinations costing this much or more are never accepted.
    pub cost_ceiling: f32,
    pub min_font_size: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            cost_ceiling: DEFAULT_COST_CEILING,
            min_font_size: DEFAULT_MIN_FONT_SIZE,
        }
    }
}

/// Outcome of resolving one row.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The row already clears the obstruction below; nothing to change.
    Clear,
    Resolved {
        candidate: StyleCandidate,
        position: LadderPosition,
        style: RowStyle,
        cost: f32,
    },
    /// No combination under the cost ceiling clears the obstruction.
    Unresolved { bottom_gap: f32 },
}

impl Resolution {
    /// Cost of the committed adjustment; `None` when the row could not be resolved.
    pub fn cost(&self) -> Option<f32> {
        match self {
            Resolution::Clear => Some(0.0),
            Resolution::Resolved { cost, .. } => Some(*cost),
            Resolution::Unresolved { .. } => None,
        }
    }

    /// The style to commit. Unresolved rows keep `base`.
    pub fn committed_style(&self, base: RowStyle) -> RowStyle {
        match self {
            Resolution::Resolved { style, .. } => *style,
            Resolution::Clear | Resolution::Unresolved { .. } => base,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Best {
    position: LadderPosition,
    cost: f32,
}

struct Search<'p, 'a, M: ?Sized> {
    probe: &'p RowProbe<'a>,
    measurer: &'p M,
    ladders: Ladders,
    ceiling: f32,
}

impl<M: TextMeasurer + ?Sized> Search<'_, '_, M> {
    fn bound(&self, best: Option<Best>) -> f32 {
        best.map_or(self.ceiling, |b| b.cost)
    }

    fn feasible(&self, position: &LadderPosition) -> bool {
        let candidate = self.ladders.candidate(position);
        let style = self.probe.apply(&candidate, self.measurer);
        self.probe.bottom_gap(&style, self.measurer) >= 0.0
    }

    /// Walks `axis`'s ladder starting from the parent's running cost, recursing
    /// into the next axis for every step, and returns the updated best.
    fn descend(
        &self,
        axis: Axis,
        cost: f32,
        mut position: LadderPosition,
        mut best: Option<Best>,
    ) -> Option<Best> {
        let mut running = cost;
        for step in 0..self.ladders.len(axis) {
            running += axis.step_cost(step);
            if running >= self.bound(best) {
                break;
            }
            position.set(axis, step);

            match axis.next() {
                Some(next) => best = self.descend(next, running, position, best),
                None => {
                    if self.feasible(&position) {
                        best = Some(Best {
                            position,
                            cost: running,
                        });
                        break;
                    }
                }
            }
        }
        best
    }
}

/// Finds the cheapest style adjustment that makes the probed row clear its
/// bottom obstruction.
pub fn resolve_row<M: TextMeasurer + ?Sized>(
    probe: &RowProbe<'_>,
    measurer: &M,
    config: &SearchConfig,
) -> Resolution {
    let bottom_gap = probe.bottom_gap(&probe.base, measurer);
    if bottom_gap >= 0.0 {
        return Resolution::Clear;
    }

    let search = Search {
        probe,
        measurer,
        ladders: Ladders::new(probe.base.font_size, config.min_font_size),
        ceiling: config.cost_ceiling,
    };

    match search.descend(Axis::LineHeight, 0.0, LadderPosition::default(), None) {
        Some(best) => {
            debug_assert_eq!(best.cost, best.position.cost());
            let candidate = search.ladders.candidate(&best.position);
            Resolution::Resolved {
                candidate,
                position: best.position,
                style: probe.apply(&candidate, measurer),
                cost: best.cost,
            }
        }
        None => Resolution::Unresolved { bottom_gap },
    }
}
