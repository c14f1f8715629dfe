//! Text measurement seam.
//!
//! The resolver never touches a live layout engine. It asks a `TextMeasurer`
//! how tall a row's text renders under a candidate style and does the
//! geometry itself. Any `Fn(&str, &RowStyle) -> f32` is a measurer, which is
//! how tests pin the rendered height to a deterministic function of the style.

use crate::layout::font_metrics::{get_metrics, FontFamily, FontMetricTable};
use crate::layout::row::RowStyle;

pub trait TextMeasurer {
    /// Rendered content height in pixels of `text` laid out with `style`.
    fn content_height(&self, text: &str, style: &RowStyle) -> f32;
}

impl<F> TextMeasurer for F
where
    F: Fn(&str, &RowStyle) -> f32,
{
    fn content_height(&self, text: &str, style: &RowStyle) -> f32 {
        self(text, style)
    }
}

/// Table-driven measurer: greedy word wrap at the style's width, then
/// `lines × font_size × line_height`.
#[derive(Clone, Copy)]
pub struct MetricMeasurer {
    metrics: &'static FontMetricTable,
}

impl MetricMeasurer {
    pub fn new(font: FontFamily) -> Self {
        Self {
            metrics: get_metrics(font),
        }
    }
}

impl TextMeasurer for MetricMeasurer {
    fn content_height(&self, text: &str, style: &RowStyle) -> f32 {
        let lines = self
            .metrics
            .wrapped_lines(text, style.width, style.font_size);
        lines as f32 * style.font_size * style.line_height
    }
}
