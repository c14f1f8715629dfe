//! Axum route handlers for the Forms API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::forms::print::build_pages;
use crate::forms::stats::{self, StatsReport};
use crate::layout::{run_layout_pass, LayoutResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FormLayoutQuery {
    /// Translation to render; the source text when absent.
    pub lang: Option<String>,
}

/// GET /api/v1/forms/:form_id/layout
///
/// Loads the form (and translation), assembles its pages, and returns them with
/// overlap-resolved row styles. Unpublished translations are not found.
pub async fn handle_form_layout(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    Query(params): Query<FormLayoutQuery>,
) -> Result<Json<LayoutResult>, AppError> {
    let form = state.forms.load_form(&form_id).await?;
    let translation = match params.lang.as_deref() {
        Some(lang) => {
            let translation = state.forms.load_translation(&form_id, lang).await?;
            if !stats::is_published(&form, &translation) {
                return Err(AppError::NotFound(format!(
                    "The '{lang}' translation of form '{form_id}' is not published yet"
                )));
            }
            Some(translation)
        }
        None => None,
    };

    let pages = build_pages(&form, translation.as_ref(), state.config.font_size_px)?;
    if pages.is_empty() {
        return Err(AppError::UnprocessableEntity(format!(
            "Form '{form_id}' has no rows to lay out"
        )));
    }
    let result = run_layout_pass(pages, state.layout).await?;

    info!(
        form = %form_id,
        lang = params.lang.as_deref().unwrap_or("source"),
        adjusted = result.adjusted_count,
        flagged = result.flagged_count,
        "Form layout resolved"
    );

    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub form: Option<String>,
    pub lang: Option<String>,
    /// List the untranslated and extra strings, not just their counts.
    #[serde(default)]
    pub verbose: bool,
}

/// GET /api/v1/stats
///
/// Translation coverage for every form and language under the forms root.
pub async fn handle_stats(
    State(state): State<AppState>,
    Query(params): Query<StatsQuery>,
) -> Result<Json<StatsReport>, AppError> {
    let catalog = state.forms.catalog().await?;
    let report = stats::build_report(
        &catalog,
        params.form.as_deref(),
        params.lang.as_deref(),
        params.verbose,
    )?;

    info!(
        forms = report.forms.len(),
        languages = report.languages.len(),
        "Translation stats computed"
    );
    Ok(Json(report))
}
