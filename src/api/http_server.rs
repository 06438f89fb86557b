// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP server wiring for the diagnostic node
//!
//! Exposes health and model-listing endpoints, the four predict routes, and
//! static file serving for stored scans and overlays.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::routing::DiagnosticRouter;

use super::errors::ApiError;
use super::predict::{predict_chest, predict_ct, predict_knee, predict_mri};
use crate::experts::ExpertInfo;

/// API contract version reported by the health endpoint
const API_VERSION: &str = "1.0.0";

#[derive(Clone)]
pub struct AppState {
    pub router: Arc<DiagnosticRouter>,
    pub static_dir: PathBuf,
}

/// Assemble the application router with all routes and layers attached
pub fn build_router(state: AppState) -> Router {
    let static_dir = state.static_dir.clone();

    Router::new()
        // Health check
        .route("/health", get(health_handler))
        // Classifier inventory
        .route("/models", get(models_handler))
        // Expert predict routes
        .route("/predict-xray/chest", post(predict_chest))
        .route("/predict-xray/knee", post(predict_knee))
        .route("/predict-mri", post(predict_mri))
        .route("/predict-ct", post(predict_ct))
        // Stored scans and generated overlays
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState, port: u16) -> anyhow::Result<()> {
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port).parse::<SocketAddr>()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Diagnostic node listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<ExpertInfo>,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: API_VERSION.to_string(),
    })
}

async fn models_handler(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: state.router.registry().list_experts(),
    })
}

pub struct ApiErrorResponse(pub ApiError);

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let error_response = self.0.to_response(None);

        (status, Json(error_response)).into_response()
    }
}
