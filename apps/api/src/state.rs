use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextModel;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Read-only after startup. The model lives behind `Arc<dyn TextModel>` so
/// handler tests can swap in a recording stub.
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn TextModel>,
    pub config: Config,
}
