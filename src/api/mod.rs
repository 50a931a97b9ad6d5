mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::analysis::AnalysisClient;
use crate::registry::{Registry, SharedRegistry};

pub use handlers::AnalyzeResponse;

/// Shared state for request handlers.
///
/// One registry per server process. The analysis client is optional; without
/// it, analysis endpoints answer 503 while the registry endpoints keep working.
#[derive(Clone)]
pub struct AppState {
    pub registry: SharedRegistry,
    pub analyzer: Option<Arc<AnalysisClient>>,
}

impl AppState {
    pub fn new(registry: SharedRegistry) -> Self {
        Self {
            registry,
            analyzer: None,
        }
    }

    pub fn with_analyzer(mut self, client: AnalysisClient) -> Self {
        self.analyzer = Some(Arc::new(client));
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Registry::shared())
    }
}

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Projects
        .route("/projects", get(handlers::list_projects).post(handlers::create_project))
        .route(
            "/projects/{name}",
            get(handlers::get_project).delete(handlers::delete_project),
        )
        .route("/projects/{name}/comparison", get(handlers::compare_features))
        .route(
            "/projects/{name}/comparison/markdown",
            get(handlers::compare_features_markdown),
        )
        // Features (by project and feature name)
        .route(
            "/projects/{name}/features",
            get(handlers::list_project_features).post(handlers::add_feature),
        )
        .route(
            "/projects/{name}/features/{feature}",
            get(handlers::get_feature).delete(handlers::remove_feature),
        )
        .route(
            "/projects/{name}/features/{feature}/analysis",
            put(handlers::set_feature_analysis),
        )
        .route(
            "/projects/{name}/features/{feature}/analyze",
            post(handlers::analyze_feature),
        )
        // Ad-hoc analysis
        .route("/analyze", post(handlers::analyze))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
