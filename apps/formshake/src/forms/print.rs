//! Assembles the printable pages of a form: one `Page` per background page,
//! rows in document order, appended fragments folded into their host row.

use crate::errors::AppError;
use crate::forms::models::{FormDefinition, Translation};
use crate::layout::{Page, Rect, Row, RowStyle};

/// Form coordinates are PDF points (72/in); rows are laid out in CSS px (96/in).
pub const PX_PER_PT: f32 = 96.0 / 72.0;
pub const DEFAULT_LINE_HEIGHT: f32 = 1.2;
/// Upper bound on `max(row.page) + 1`.
pub const MAX_FORM_PAGES: u32 = 500;

/// Builds pages `0..=max(row.page)` with their baseline row styles.
///
/// Missing translation entries fall back to the source text. A row with
/// `append` whose page has no row yet becomes a row of its own. Forms that
/// reference a page at or beyond `MAX_FORM_PAGES` are rejected.
pub fn build_pages(
    form: &FormDefinition,
    translation: Option<&Translation>,
    font_size_px: f32,
) -> Result<Vec<Page>, AppError> {
    let Some(last_page) = form.rows.iter().map(|r| r.page).max() else {
        return Ok(Vec::new());
    };
    if last_page >= MAX_FORM_PAGES {
        return Err(AppError::UnprocessableEntity(format!(
            "form references page {last_page}; at most {MAX_FORM_PAGES} pages are supported"
        )));
    }

    let page_rect = Rect::new(
        0.0,
        0.0,
        form.page_width * PX_PER_PT,
        form.page_height * PX_PER_PT,
    );
    let mut pages: Vec<Page> = (0..=last_page)
        .map(|number| Page {
            number,
            rect: page_rect,
            rows: Vec::new(),
        })
        .collect();

    let translate = |source: &str| -> String {
        translation
            .and_then(|t| t.get(source))
            .filter(|s| !s.is_empty())
            .cloned()
            .unwrap_or_else(|| source.to_string())
    };

    for (index, form_row) in form.rows.iter().enumerate() {
        let rows = &mut pages[form_row.page as usize].rows;
        let text = translate(&form_row.content);

        if let (Some(joiner), Some(host)) = (&form_row.append, rows.last_mut()) {
            host.text.push_str(joiner);
            host.text.push_str(&text);
            continue;
        }

        rows.push(Row {
            id: format!("{}-{index}", form_row.page),
            text,
            x: form_row.x1 * PX_PER_PT,
            style: RowStyle::new(
                form_row.y1 * PX_PER_PT,
                (form_row.x2 - form_row.x1).max(0.0) * PX_PER_PT,
                font_size_px,
                DEFAULT_LINE_HEIGHT,
            ),
            align: form_row.align,
        });
    }

    Ok(pages)
}
