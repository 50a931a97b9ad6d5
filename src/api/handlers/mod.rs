use std::sync::{Arc, MutexGuard};

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::AppState;
use crate::analysis::{AnalysisClient, AnalysisError, Clarification, FeatureRequest};
use crate::models::*;
use crate::registry::{Registry, SharedRegistry};
use crate::report;

type ApiError = (StatusCode, String);

// ============================================================
// Error Handling
// ============================================================

/// Log an internal error and return a sanitized response to the client.
fn internal_error(e: impl std::fmt::Display) -> ApiError {
    tracing::error!("Internal error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

fn not_found(what: &str) -> ApiError {
    (StatusCode::NOT_FOUND, format!("{} not found", what))
}

fn bad_request(msg: &str) -> ApiError {
    tracing::warn!("Validation error: {}", msg);
    (StatusCode::BAD_REQUEST, msg.to_string())
}

/// Map analysis failures to status codes. Upstream problems (network, model
/// reply) are 502; a missing client configuration is 503.
fn analysis_error(e: AnalysisError) -> ApiError {
    match &e {
        AnalysisError::InvalidRequest(msg) => bad_request(msg),
        AnalysisError::MissingApiKey => {
            tracing::warn!("Analysis requested without an API key");
            (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
        }
        _ => {
            tracing::error!("Analysis failed: {}", e);
            (StatusCode::BAD_GATEWAY, format!("Analysis failed: {}", e))
        }
    }
}

fn lock(registry: &SharedRegistry) -> Result<MutexGuard<'_, Registry>, ApiError> {
    registry
        .lock()
        .map_err(|_| internal_error("registry lock poisoned"))
}

fn analyzer(state: &AppState) -> Result<Arc<AnalysisClient>, ApiError> {
    state
        .analyzer
        .clone()
        .ok_or_else(|| analysis_error(AnalysisError::MissingApiKey))
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Projects
// ============================================================

pub async fn list_projects(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let registry = lock(&state.registry)?;
    Ok(Json(registry.list_projects()))
}

pub async fn create_project(
    State(state): State<AppState>,
    Json(input): Json<CreateProjectInput>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    if input.name.trim().is_empty() {
        return Err(bad_request("Project name is required"));
    }

    let mut registry = lock(&state.registry)?;
    let created = registry.create_project(input).cloned();
    match created {
        Ok(project) => Ok((StatusCode::CREATED, Json(project))),
        Err(e) => {
            tracing::warn!("{}", e);
            Err((StatusCode::CONFLICT, e.to_string()))
        }
    }
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Project>, ApiError> {
    let registry = lock(&state.registry)?;
    registry
        .get_project(&name)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("Project"))
}

pub async fn delete_project(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    let removed = lock(&state.registry)?.delete_project(&name);
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Project"))
    }
}

pub async fn compare_features(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<RankedFeature>>, ApiError> {
    let registry = lock(&state.registry)?;
    Ok(Json(registry.compare_features(&name)))
}

/// The same ranking rendered as a markdown table.
pub async fn compare_features_markdown(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let ranked = lock(&state.registry)?.compare_features(&name);
    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        report::render_comparison(&ranked),
    ))
}

// ============================================================
// Features
// ============================================================

/// Features of a project; an unknown project yields an empty list.
pub async fn list_project_features(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Feature>>, ApiError> {
    let registry = lock(&state.registry)?;
    Ok(Json(registry.get_project_features(&name).to_vec()))
}

pub async fn add_feature(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(input): Json<CreateFeatureInput>,
) -> Result<(StatusCode, Json<Feature>), ApiError> {
    if input.name.trim().is_empty() {
        return Err(bad_request("Feature name is required"));
    }

    let feature = Feature::new(input);
    let added = lock(&state.registry)?.add_feature_to_project(&name, feature.clone());
    if added {
        Ok((StatusCode::CREATED, Json(feature)))
    } else {
        Err(not_found("Project"))
    }
}

pub async fn get_feature(
    State(state): State<AppState>,
    Path((name, feature)): Path<(String, String)>,
) -> Result<Json<Feature>, ApiError> {
    let registry = lock(&state.registry)?;
    let project = registry.get_project(&name).ok_or_else(|| not_found("Project"))?;
    project
        .get_feature(&feature)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("Feature"))
}

pub async fn remove_feature(
    State(state): State<AppState>,
    Path((name, feature)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let mut registry = lock(&state.registry)?;
    let project = registry
        .get_project_mut(&name)
        .ok_or_else(|| not_found("Project"))?;
    if project.remove_feature(&feature) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Feature"))
    }
}

/// Store an externally produced analysis payload on a feature.
pub async fn set_feature_analysis(
    State(state): State<AppState>,
    Path((name, feature)): Path<(String, String)>,
    Json(payload): Json<Value>,
) -> Result<Json<Feature>, ApiError> {
    store_analysis(&state.registry, &name, &feature, payload).map(Json)
}

/// Run the analysis client on a stored feature and keep the result.
///
/// An optional JSON body of answered clarifying questions is folded into the
/// request context, so a feature can be re-analyzed after the model asked for
/// more detail. The registry lock is released while the model call is in
/// flight.
pub async fn analyze_feature(
    State(state): State<AppState>,
    Path((name, feature)): Path<(String, String)>,
    clarifications: Option<Json<Vec<Clarification>>>,
) -> Result<Json<Feature>, ApiError> {
    let client = analyzer(&state)?;

    let request = {
        let registry = lock(&state.registry)?;
        let project = registry.get_project(&name).ok_or_else(|| not_found("Project"))?;
        let stored = project
            .get_feature(&feature)
            .ok_or_else(|| not_found("Feature"))?;
        let mut request = FeatureRequest::from_feature(stored);
        if let Some(Json(answers)) = clarifications {
            request.add_clarifications(answers);
        }
        request
    };

    let analysis = client.analyze(&request).await.map_err(analysis_error)?;
    let payload = serde_json::to_value(&analysis).map_err(internal_error)?;

    store_analysis(&state.registry, &name, &feature, payload).map(Json)
}

fn store_analysis(
    registry: &SharedRegistry,
    project_name: &str,
    feature_name: &str,
    payload: Value,
) -> Result<Feature, ApiError> {
    let mut registry = lock(registry)?;
    if !registry.set_feature_analysis(project_name, feature_name, payload) {
        return Err(match registry.get_project(project_name) {
            Some(_) => not_found("Feature"),
            None => not_found("Project"),
        });
    }
    registry
        .get_project(project_name)
        .and_then(|p| p.get_feature(feature_name))
        .cloned()
        .ok_or_else(|| not_found("Feature"))
}

// ============================================================
// Ad-hoc analysis
// ============================================================

/// Result of an ad-hoc analysis.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub analysis: FeatureAnalysis,
    /// Advisory warning about the feature name, if any.
    pub name_warning: Option<String>,
    /// `R×I×C/E` recomputed from the components, for comparison with the
    /// model's `final_rice_score`.
    pub computed_rice_score: Option<f64>,
}

pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<FeatureRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let name_warning = request.validate().map_err(analysis_error)?;
    let client = analyzer(&state)?;
    let analysis = client.analyze(&request).await.map_err(analysis_error)?;

    Ok(Json(AnalyzeResponse {
        computed_rice_score: analysis.rice_scores.computed_score(),
        name_warning: name_warning.map(|w| w.to_string()),
        analysis,
    }))
}
