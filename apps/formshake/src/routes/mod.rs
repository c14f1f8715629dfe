pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::forms::handlers as forms;
use crate::layout::handlers as layout;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/layout/resolve", post(layout::handle_resolve))
        .route(
            "/api/v1/forms/:form_id/layout",
            get(forms::handle_form_layout),
        )
        .route("/api/v1/stats", get(forms::handle_stats))
        .with_state(state)
}
