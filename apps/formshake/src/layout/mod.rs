// Row overlap resolution: neighbour context, cost-minimizing style search, and
// the per-page pass that drives them in document order.
// The pass is CPU-bound and must run inside tokio::task::spawn_blocking.

pub mod context;
pub mod font_metrics;
pub mod geometry;
pub mod handlers;
pub mod measure;
pub mod pass;
pub mod row;
pub mod search;

// Re-export the public API consumed by other modules (forms, config, handlers).
pub use font_metrics::FontFamily;
pub use geometry::Rect;
pub use pass::{run_layout_pass, LayoutConfig, LayoutResult};
pub use row::{Page, Row, RowStyle, TextAlign};
pub use search::SearchConfig;
