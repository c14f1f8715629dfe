//! Axum route handlers for the Layout API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::layout::font_metrics::FontFamily;
use crate::layout::pass::{run_layout_pass, LayoutResult};
use crate::layout::row::Page;
use crate::state::AppState;

/// Largest accepted font size in px.
pub const MAX_FONT_SIZE: f32 = 1_000.0;
/// Largest accepted page extent or row width in px.
pub const MAX_EXTENT: f32 = 100_000.0;

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub pages: Vec<Page>,
    /// Overrides the configured measurement font for this request.
    #[serde(default)]
    pub font: Option<FontFamily>,
}

/// POST /api/v1/layout/resolve
///
/// Runs the overlap pass over caller-supplied pages and returns the committed
/// row styles with a per-row report.
pub async fn handle_resolve(
    State(state): State<AppState>,
    Json(request): Json<ResolveRequest>,
) -> Result<Json<LayoutResult>, AppError> {
    validate_pages(&request.pages)?;

    let mut config = state.layout;
    if let Some(font) = request.font {
        config.font = font;
    }

    let result = run_layout_pass(request.pages, config).await?;
    Ok(Json(result))
}

/// Rejects empty requests and geometry the search cannot reason about.
pub(crate) fn validate_pages(pages: &[Page]) -> Result<(), AppError> {
    if pages.is_empty() {
        return Err(AppError::Validation("pages cannot be empty".to_string()));
    }

    for page in pages {
        let r = page.rect;
        let finite = [r.x1, r.y1, r.x2, r.y2].iter().all(|v| v.is_finite());
        let in_range = |extent: f32| (0.0..=MAX_EXTENT).contains(&extent);
        if !finite || !in_range(r.width()) || !in_range(r.height()) {
            return Err(AppError::Validation(format!(
                "page {} has an invalid rect",
                page.number
            )));
        }

        for row in &page.rows {
            let s = row.style;
            let finite = [row.x, s.top, s.width, s.font_size, s.line_height]
                .iter()
                .all(|v| v.is_finite());
            if !finite || s.width <= 0.0 || s.font_size <= 0.0 || s.line_height <= 0.0 {
                return Err(AppError::Validation(format!(
                    "row '{}' on page {} has an invalid style",
                    row.id, page.number
                )));
            }
            if s.font_size > MAX_FONT_SIZE || s.width > MAX_EXTENT {
                return Err(AppError::Validation(format!(
                    "row '{}' on page {} exceeds the {MAX_FONT_SIZE}px font / {MAX_EXTENT}px width limit",
                    row.id, page.number
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Rect, Row, RowStyle, TextAlign};

    fn make_page(style: RowStyle) -> Page {
        Page {
            number: 0,
            rect: Rect::new(0.0, 0.0, 100.0, 100.0),
            rows: vec![Row {
                id: "0-0".to_string(),
                text: "Name".to_string(),
                x: 0.0,
                style,
                align: TextAlign::Left,
            }],
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_page() {
        assert!(validate_pages(&[make_page(RowStyle::new(0.0, 50.0, 12.0, 1.2))]).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_request() {
        assert!(matches!(validate_pages(&[]), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_degenerate_styles() {
        for style in [
            RowStyle::new(0.0, 0.0, 12.0, 1.2),
            RowStyle::new(0.0, 50.0, -1.0, 1.2),
            RowStyle::new(f32::NAN, 50.0, 12.0, 1.2),
        ] {
            assert!(validate_pages(&[make_page(style)]).is_err(), "{style:?}");
        }
    }

    #[test]
    fn test_validate_rejects_oversized_styles() {
        for style in [
            RowStyle::new(0.0, 50.0, 3.0e7, 1.2),
            RowStyle::new(0.0, 1.0e9, 12.0, 1.2),
        ] {
            assert!(
                matches!(validate_pages(&[make_page(style)]), Err(AppError::Validation(_))),
                "{style:?}"
            );
        }
        assert!(validate_pages(&[make_page(RowStyle::new(0.0, 50.0, MAX_FONT_SIZE, 1.2))]).is_ok());
    }

    #[test]
    fn test_validate_rejects_oversized_page() {
        let mut page = make_page(RowStyle::new(0.0, 50.0, 12.0, 1.2));
        page.rect = Rect::new(0.0, 0.0, 100.0, 1.0e9);
        assert!(validate_pages(&[page]).is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_page_rect() {
        let mut page = make_page(RowStyle::new(0.0, 50.0, 12.0, 1.2));
        page.rect = Rect::new(0.0, 100.0, 100.0, 0.0);
        assert!(validate_pages(&[page]).is_err());
    }
}
