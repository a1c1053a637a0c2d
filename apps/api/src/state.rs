use std::sync::Arc;

use crate::analysis::catalog::AnalysisCatalog;
use crate::config::Config;
use crate::enrichment::Enricher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Read-only vocabularies, role profiles and action verbs. Built once at startup.
    pub catalog: Arc<AnalysisCatalog>,
    /// Pluggable enrichment backend. `DisabledEnricher` when ENRICHMENT_URL is unset.
    pub enricher: Arc<dyn Enricher>,
}
