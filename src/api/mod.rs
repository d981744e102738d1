// src/api/mod.rs — HTTP API server

pub mod handlers;
pub mod types;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::core::orchestrator::Orchestrator;
use crate::core::store::ExecutionStore;
use crate::infra::config::Settings;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub store: ExecutionStore,
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    /// Wire up the store and orchestrator against the real provider.
    pub fn new(settings: Arc<Settings>) -> Self {
        let store = ExecutionStore::new();
        let orchestrator = Arc::new(Orchestrator::with_default_provider(
            settings.clone(),
            store.clone(),
        ));
        Self {
            settings,
            store,
            orchestrator,
        }
    }
}

/// Build the axum router with all API routes.
pub fn build_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .settings
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring unparseable CORS origin: {origin}");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .route("/api/v1", get(handlers::root))
        .route("/api/v1/health", get(handlers::health))
        .route("/api/v1/test-categories", get(handlers::test_categories))
        .route(
            "/api/v1/predefined-test-cases",
            get(handlers::predefined_test_cases),
        )
        .route("/api/v1/execute-tests", post(handlers::execute_tests))
        .route("/api/v1/quick-test", post(handlers::quick_test))
        .route("/api/v1/executions", get(handlers::list_executions))
        .route("/api/v1/executions/{id}", get(handlers::get_execution))
        .route(
            "/api/v1/executions/{id}/report",
            get(handlers::execution_report),
        )
        .route(
            "/api/v1/generate-test-suite",
            post(handlers::generate_test_suite),
        )
        .route("/api/v1/stats", get(handlers::stats))
        .layer(cors)
        .with_state(state)
}

/// Start the API server (blocking until shutdown).
pub async fn start_server(state: AppState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", state.settings.host, state.settings.port);
    let router = build_router(state);

    tracing::info!("API server listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
