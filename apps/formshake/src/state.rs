use crate::config::Config;
use crate::forms::FormStore;
use crate::layout::LayoutConfig;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Measurement font and search bounds for every layout pass.
    pub layout: LayoutConfig,
    pub forms: FormStore,
}
