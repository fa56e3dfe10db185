use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::store::CandidateStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Postgres in production, in-memory when `DATABASE_URL` is unset.
    pub store: Arc<dyn CandidateStore>,
    /// Gemini client in production; tests plug in a scripted model.
    pub llm: Arc<dyn TextGenerator>,
    pub config: Config,
}
