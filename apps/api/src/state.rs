use std::sync::Arc;

use crate::config::Config;
use crate::interaction_log::InteractionLogger;
use crate::providers::ModelProvider;
use crate::render::Renderer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable model provider. Selected via MODEL_NAME env.
    pub provider: Arc<dyn ModelProvider>,
    pub renderer: Arc<dyn Renderer>,
    pub interaction_log: Arc<InteractionLogger>,
}
