mod analysis;
mod config;
mod enrichment;
mod errors;
mod extraction;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::catalog::AnalysisCatalog;
use crate::config::Config;
use crate::enrichment::{DisabledEnricher, Enricher, HttpEnricher};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Fails fast on malformed env vars
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume analyzer v{}", env!("CARGO_PKG_VERSION"));

    let catalog = load_catalog(&config)?;
    info!(
        technical = catalog.vocabulary.technical.len(),
        soft = catalog.vocabulary.soft.len(),
        roles = catalog.roles.len(),
        action_verbs = catalog.action_verb_count(),
        "Analysis catalog loaded"
    );

    let enricher = build_enricher(&config)?;
    info!("Default ATS strategy: {:?}", config.ats_strategy);

    let cors = match &config.cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("CORS_ORIGIN is not a valid origin: {origin}"))?,
            )
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
        None => CorsLayer::permissive(),
    };

    let state = AppState {
        config: config.clone(),
        catalog: Arc::new(catalog),
        enricher,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Built-in catalog, or the JSON file at CATALOG_PATH. Either way it must validate.
fn load_catalog(config: &Config) -> Result<AnalysisCatalog> {
    let catalog = match &config.catalog_path {
        Some(path) => {
            info!("Loading analysis catalog from {}", path.display());
            AnalysisCatalog::from_json_file(path)
                .with_context(|| format!("failed to load catalog from {}", path.display()))?
        }
        None => AnalysisCatalog::builtin(),
    };
    catalog.validate().context("analysis catalog is invalid")?;
    Ok(catalog)
}

fn build_enricher(config: &Config) -> Result<Arc<dyn Enricher>> {
    match &config.enrichment_url {
        Some(url) => {
            let enricher = HttpEnricher::new(
                url.clone(),
                config.enrichment_api_key.clone(),
                Duration::from_secs(config.enrichment_timeout_secs),
            )
            .context("failed to build enrichment client")?;
            info!("Enrichment enabled: {url}");
            Ok(Arc::new(enricher))
        }
        None => {
            warn!("ENRICHMENT_URL not set; key phrases, entities and sentiment will be neutral");
            Ok(Arc::new(DisabledEnricher))
        }
    }
}
