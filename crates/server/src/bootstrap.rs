use std::sync::Arc;

use thiserror::Error;
use tracing::info;
use treatmatch_core::config::AppConfig;
use treatmatch_core::{
    ApplicationError, Catalog, InMemoryRecommendationSink, RecommendationEngine,
    RecommendationService,
};

/// Shared state handed to every route.
#[derive(Clone)]
pub struct AppState {
    pub service: RecommendationService,
}

impl AppState {
    pub fn new(catalog: Catalog, max_stored_sessions: usize) -> Self {
        let service = RecommendationService::new(
            RecommendationEngine::new(),
            Arc::new(catalog),
            Arc::new(InMemoryRecommendationSink::with_max_sessions(max_stored_sessions)),
        );
        Self { service }
    }
}

pub struct Application {
    pub config: AppConfig,
    pub state: AppState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("catalog load failed: {0}")]
    Catalog(#[from] ApplicationError),
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let catalog = Catalog::load(config.catalog.path.as_deref())?;
    info!(
        event_name = "system.bootstrap.catalog_loaded",
        correlation_id = "bootstrap",
        package_count = catalog.len(),
        source = config
            .catalog
            .path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "demo".to_string()),
        "catalog loaded and validated"
    );

    let state = AppState::new(catalog, config.server.max_stored_sessions);
    Ok(Application { state, config })
}
