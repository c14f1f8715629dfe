//! Page resolution pass: runs the style search over every row of a page.
//!
//! # Ordering
//! Rows are processed strictly in document order. Committing a style changes the
//! row's geometry, which changes what the following rows see as neighbours, so
//! the pass threads an explicit set of occupied rectangles through the loop and
//! re-measures a row's slot as soon as its style is committed.
//!
//! # spawn_blocking pattern
//! `run_layout_pass` is the async entry point used by handlers. The pass itself
//! (`resolve_page_sync`) is CPU-bound and runs on the blocking pool; it takes
//! owned pages so the closure is `'static`, and hands them back mutated.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::layout::context::{resolve_context, Bounds, NeighborContext};
use crate::layout::font_metrics::FontFamily;
use crate::layout::geometry::Rect;
use crate::layout::measure::{MetricMeasurer, TextMeasurer};
use crate::layout::row::Page;
use crate::layout::search::{resolve_row, Resolution, RowProbe, SearchConfig, StyleCandidate};

// ────────────────────────────────────────────────────────────────────────────
// Configuration and report types
// ────────────────────────────────────────────────────────────────────────────

/// Everything a pass needs besides the pages themselves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub font: FontFamily,
    pub search: SearchConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            font: FontFamily::Sans,
            search: SearchConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    /// Already clear of the obstruction below; style left as is.
    Untouched,
    Adjusted,
    /// Search exhausted without clearing the overlap. Needs manual review.
    Flagged,
}

/// What the pass did to one row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowOutcome {
    pub row_id: String,
    pub status: RowStatus,
    pub context: NeighborContext,
    /// Bottom gap before the row was resolved.
    pub bottom_gap: f32,
    /// `None` for flagged rows.
    pub cost: Option<f32>,
    pub candidate: Option<StyleCandidate>,
}

/// Summary of one page's pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageReport {
    pub page: u32,
    pub rows: Vec<RowOutcome>,
    pub adjusted_count: u32,
    pub flagged_count: u32,
    pub total_cost: f32,
}

/// Pages after the pass plus one report per page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutResult {
    pub pages: Vec<Page>,
    pub reports: Vec<PageReport>,
    pub adjusted_count: u32,
    pub flagged_count: u32,
}

// ────────────────────────────────────────────────────────────────────────────
// Public entry point
// ────────────────────────────────────────────────────────────────────────────

/// Resolves every page on the blocking pool, measuring text with `config.font`.
pub async fn run_layout_pass(
    pages: Vec<Page>,
    config: LayoutConfig,
) -> Result<LayoutResult, AppError> {
    tokio::task::spawn_blocking(move || {
        let measurer = MetricMeasurer::new(config.font);
        resolve_pages_sync(pages, &measurer, &config.search)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in layout pass: {e}")))
}

/// Runs `resolve_page_sync` over each page in turn and totals the reports.
pub(crate) fn resolve_pages_sync<M: TextMeasurer + ?Sized>(
    mut pages: Vec<Page>,
    measurer: &M,
    search: &SearchConfig,
) -> LayoutResult {
    let reports: Vec<PageReport> = pages
        .iter_mut()
        .map(|page| resolve_page_sync(page, measurer, search))
        .collect();

    LayoutResult {
        adjusted_count: reports.iter().map(|r| r.adjusted_count).sum(),
        flagged_count: reports.iter().map(|r| r.flagged_count).sum(),
        pages,
        reports,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Synchronous pass (runs inside spawn_blocking)
// ────────────────────────────────────────────────────────────────────────────

/// Resolves each row of `page` in document order, committing styles in place.
pub(crate) fn resolve_page_sync<M: TextMeasurer + ?Sized>(
    page: &mut Page,
    measurer: &M,
    search: &SearchConfig,
) -> PageReport {
    let mut occupied: Vec<Rect> = page.rows.iter().map(|r| r.rect(measurer)).collect();
    let mut outcomes = Vec::with_capacity(page.rows.len());

    for i in 0..page.rows.len() {
        let context = resolve_context(i, &occupied);
        let bounds = Bounds::new(&context, &occupied, &page.rect);
        let rect = occupied[i];
        let row = &mut page.rows[i];

        let probe = RowProbe::new(&row.text, row.style, &rect, &bounds);
        let bottom_gap = bounds.bottom_gap(&rect);
        let resolution = resolve_row(&probe, measurer, search);

        let (status, candidate) = match &resolution {
            Resolution::Clear => (RowStatus::Untouched, None),
            Resolution::Resolved { candidate, .. } => (RowStatus::Adjusted, Some(*candidate)),
            Resolution::Unresolved { .. } => {
                warn!(
                    page = page.number,
                    row = %row.id,
                    bottom_gap,
                    "Layout pass: could not resolve bottom overlap, row flagged for review"
                );
                (RowStatus::Flagged, None)
            }
        };

        row.style = resolution.committed_style(row.style);
        occupied[i] = row.rect(measurer);

        outcomes.push(RowOutcome {
            row_id: row.id.clone(),
            status,
            context,
            bottom_gap,
            cost: resolution.cost(),
            candidate,
        });
    }

    let adjusted_count = outcomes
        .iter()
        .filter(|o| o.status == RowStatus::Adjusted)
        .count() as u32;
    let flagged_count = outcomes
        .iter()
        .filter(|o| o.status == RowStatus::Flagged)
        .count() as u32;
    let total_cost: f32 = outcomes.iter().filter_map(|o| o.cost).sum();

    debug!(
        page = page.number,
        rows = outcomes.len(),
        adjusted = adjusted_count,
        flagged = flagged_count,
        total_cost,
        "Layout pass complete"
    );

    PageReport {
        page: page.number,
        rows: outcomes,
        adjusted_count,
        flagged_count,
        total_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::row::{Row, RowStyle, TextAlign};

    /// "shrinkable" text is three lines tall at any width; everything else is fixed.
    fn make_measurer() -> impl Fn(&str, &RowStyle) -> f32 {
        |text: &str, s: &RowStyle| match text {
            "shrinkable" => s.font_size * 3.0,
            "short" => 10.0,
            _ => 40.0,
        }
    }

    fn make_row(id: &str, text: &str, top: f32) -> Row {
        Row {
            id: id.to_string(),
            text: text.to_string(),
            x: 0.0,
            style: RowStyle::new(top, 100.0, 14.0, 1.2),
            align: TextAlign::Left,
        }
    }

    /// A (0..42) intrudes into B (40..80), which intrudes into C (79..89).
    fn make_stacked_page() -> Page {
        Page {
            number: 0,
            rect: Rect::new(0.0, 0.0, 200.0, 200.0),
            rows: vec![
                make_row("a", "shrinkable", 0.0),
                make_row("b", "fixed", 40.0),
                make_row("c", "short", 79.0),
            ],
        }
    }

    fn find<'a>(page: &'a Page, id: &str) -> &'a Row {
        page.rows.iter().find(|r| r.id == id).expect("row present")
    }

    #[test]
    fn test_earlier_commits_free_space_for_later_rows() {
        let mut page = make_stacked_page();
        let report = resolve_page_sync(&mut page, &make_measurer(), &SearchConfig::default());

        // A shrinks its font (no room above), which opens 1px above B.
        assert_eq!(page.rows[0].style.font_size, 13.0);
        assert_eq!(report.rows[0].status, RowStatus::Adjusted);
        assert_eq!(report.rows[0].cost, Some(31.5));

        // B can only move up into the space A just gave back.
        assert_eq!(page.rows[1].style.top, 39.0);
        assert_eq!(report.rows[1].status, RowStatus::Adjusted);
        assert_eq!(report.rows[1].context.top, Some(0));
        assert_eq!(report.rows[1].cost, Some(12.0));

        assert_eq!(report.rows[2].status, RowStatus::Untouched);
        assert_eq!(page.rows[2].style, RowStyle::new(79.0, 100.0, 14.0, 1.2));

        assert_eq!(report.adjusted_count, 2);
        assert_eq!(report.flagged_count, 0);
        assert_eq!(report.total_cost, 43.5);
    }

    #[test]
    fn test_document_order_changes_outcome() {
        let mut page = make_stacked_page();
        page.rows.reverse();
        let report = resolve_page_sync(&mut page, &make_measurer(), &SearchConfig::default());

        // B runs before A has shrunk, so there is no space above it yet.
        assert_eq!(find(&page, "b").style.top, 40.0);
        let b = report.rows.iter().find(|o| o.row_id == "b").expect("b outcome");
        assert_eq!(b.status, RowStatus::Flagged);
        assert_eq!(b.cost, None);
        assert_eq!(b.bottom_gap, -1.0);

        assert_eq!(find(&page, "a").style.font_size, 13.0);
        assert_eq!(report.flagged_count, 1);
    }

    #[test]
    fn test_second_pass_is_noop() {
        let mut page = make_stacked_page();
        let measurer = make_measurer();
        resolve_page_sync(&mut page, &measurer, &SearchConfig::default());
        let styles: Vec<RowStyle> = page.rows.iter().map(|r| r.style).collect();

        let report = resolve_page_sync(&mut page, &measurer, &SearchConfig::default());
        assert!(report.rows.iter().all(|o| o.status == RowStatus::Untouched));
        assert_eq!(report.total_cost, 0.0);
        let after: Vec<RowStyle> = page.rows.iter().map(|r| r.style).collect();
        assert_eq!(styles, after);
    }

    #[test]
    fn test_lone_row_resolves_against_page_bottom() {
        let mut page = Page {
            number: 2,
            rect: Rect::new(0.0, 0.0, 200.0, 100.0),
            rows: vec![make_row("only", "fixed", 70.0)],
        };
        let report = resolve_page_sync(&mut page, &make_measurer(), &SearchConfig::default());

        assert_eq!(report.page, 2);
        assert_eq!(report.rows[0].context, NeighborContext::default());
        assert_eq!(report.rows[0].bottom_gap, -10.0);
        assert_eq!(page.rows[0].style.top, 60.0);
        assert_eq!(report.rows[0].cost, Some(13.0));
    }

    #[test]
    fn test_empty_page_yields_empty_report() {
        let mut page = Page {
            number: 0,
            rect: Rect::new(0.0, 0.0, 100.0, 100.0),
            rows: vec![],
        };
        let report = resolve_page_sync(&mut page, &make_measurer(), &SearchConfig::default());
        assert!(report.rows.is_empty());
        assert_eq!(report.total_cost, 0.0);
    }

    #[test]
    fn test_resolve_pages_sync_totals_reports() {
        let mut second = make_stacked_page();
        second.number = 1;
        second.rows.reverse();
        let result = resolve_pages_sync(
            vec![make_stacked_page(), second],
            &make_measurer(),
            &SearchConfig::default(),
        );
        assert_eq!(result.reports.len(), 2);
        assert_eq!(result.pages.len(), 2);
        assert_eq!(result.adjusted_count, 3);
        assert_eq!(result.flagged_count, 1);
    }

    #[tokio::test]
    async fn test_run_layout_pass_leaves_clear_rows_untouched() {
        let page = Page {
            number: 0,
            rect: Rect::new(0.0, 0.0, 800.0, 1100.0),
            rows: vec![
                make_row("0-0", "Familienkasse", 100.0),
                make_row("0-1", "Antrag auf Kindergeld", 200.0),
            ],
        };
        let result = run_layout_pass(vec![page.clone()], LayoutConfig::default())
            .await
            .expect("pass runs");

        assert_eq!(result.adjusted_count, 0);
        assert_eq!(result.flagged_count, 0);
        assert_eq!(result.pages[0].rows[0].style, page.rows[0].style);
        assert_eq!(result.pages[0].rows[1].style, page.rows[1].style);
    }
}
