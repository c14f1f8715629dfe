//! Rows and pages: the mutable half of the layout model.
//!
//! A `Row` carries only its committed style; its rectangle is always measured
//! from that style on demand (see `Row::rect`).

use serde::{Deserialize, Serialize};

use crate::layout::geometry::Rect;
use crate::layout::measure::TextMeasurer;

/// The four tunable style fields of a rendered row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowStyle {
    /// Unitless line-height multiplier.
    pub line_height: f32,
    /// Box width in pixels.
    pub width: f32,
    pub font_size: f32,
    /// Vertical position of the box's top edge on the page, in pixels.
    pub top: f32,
}

impl RowStyle {
    pub fn new(top: f32, width: f32, font_size: f32, line_height: f32) -> Self {
        Self {
            line_height,
            width,
            font_size,
            top,
        }
    }
}

/// Horizontal text alignment inside the row box. Carried through to the
/// renderer; wrapping and height do not depend on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// A rendered text annotation on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Row {
    pub id: String,
    pub text: String,
    /// Left edge in pixels. Never changed by the resolver.
    pub x: f32,
    pub style: RowStyle,
    #[serde(default)]
    pub align: TextAlign,
}

impl Row {
    /// Measures the row's rectangle under its currently committed style.
    pub fn rect<M: TextMeasurer + ?Sized>(&self, measurer: &M) -> Rect {
        rect_for(self.x, &self.text, &self.style, measurer)
    }
}

/// Rectangle a row with `text` at `x` would occupy if rendered with `style`.
pub fn rect_for<M: TextMeasurer + ?Sized>(
    x: f32,
    text: &str,
    style: &RowStyle,
    measurer: &M,
) -> Rect {
    let height = measurer.content_height(text, style);
    Rect::from_origin(x, style.top, style.width, height)
}

/// A page owns its rows, in document order, for the duration of a pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub number: u32,
    /// Page boundary; the implicit neighbour in any direction with no row.
    pub rect: Rect,
    pub rows: Vec<Row>,
}
