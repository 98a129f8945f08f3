use std::sync::Arc;

use crate::extraction::Extractor;
use crate::llm_client::StructuredTextService;
use crate::render::Renderer;
use crate::store::RecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Extractor,
    /// Text-understanding service. `LlmClient` in production, a stub in tests.
    pub llm: Arc<dyn StructuredTextService>,
    /// Postgres-backed, or in-memory when no database is configured.
    pub store: Arc<dyn RecordStore>,
    pub renderer: Renderer,
}
