use crate::config::Config;

/// Shared application state injected into route handlers via Axum extractors.
///
/// Holds configuration only. Renderers are built per request and never shared.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
}
