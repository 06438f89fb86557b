// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Predict endpoint handlers
//!
//! Four routes share one flow: pull the scan out of the multipart body, run
//! the two-stage orchestrator, persist the upload, assemble the response.
//! The scan type string each route passes is what drives stage-1 routing.

use anyhow::Context;
use axum::{extract::State, Json};
use axum_extra::extract::Multipart;
use rand::Rng;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::api::errors::ApiError;
use crate::api::http_server::{ApiErrorResponse, AppState};
use crate::imaging::{detect_format, format_to_extension};

use super::response::DiagnosisResponse;

/// POST /predict-xray/chest - Expert node for thoracic/chest analysis
pub async fn predict_chest(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<DiagnosisResponse>, ApiErrorResponse> {
    predict_scan(state, multipart, "Chest X-ray").await
}

/// POST /predict-xray/knee - Expert node for knee osteoarthritis grading
pub async fn predict_knee(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<DiagnosisResponse>, ApiErrorResponse> {
    predict_scan(state, multipart, "Knee X-ray").await
}

/// POST /predict-mri
pub async fn predict_mri(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<DiagnosisResponse>, ApiErrorResponse> {
    predict_scan(state, multipart, "MRI").await
}

/// POST /predict-ct
pub async fn predict_ct(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<DiagnosisResponse>, ApiErrorResponse> {
    predict_scan(state, multipart, "CT").await
}

/// The uploaded scan as pulled from the multipart body
struct ScanUpload {
    data: Vec<u8>,
    filename: Option<String>,
}

async fn predict_scan(
    state: AppState,
    mut multipart: Multipart,
    scan_type: &str,
) -> Result<Json<DiagnosisResponse>, ApiErrorResponse> {
    debug!("Predict request received for scan type '{}'", scan_type);

    // 1. Pull the scan out of the multipart body
    let upload = extract_scan_upload(&mut multipart).await?;

    // 2. Route and run the expert. Malformed scans are absorbed into the
    //    simulation path inside the expert, so this only fails on
    //    orchestration errors.
    let result = state
        .router
        .run_inference(&upload.data, scan_type)
        .await
        .map_err(|e| {
            warn!("Inference orchestration failed: {}", e);
            ApiErrorResponse(ApiError::InternalError(format!("Inference failed: {}", e)))
        })?;

    // 3. Persist the upload and build its public URL
    let image_url = save_upload(&state.static_dir, &upload).await.map_err(|e| {
        warn!("Failed to persist upload: {}", e);
        ApiErrorResponse(ApiError::InternalError(format!(
            "Failed to store scan: {}",
            e
        )))
    })?;

    info!(
        "Diagnosis complete: {} ({:.1}%) via {} [{}]",
        result.inference.prediction,
        result.inference.confidence * 100.0,
        result.inference.architecture,
        result.inference.engine
    );

    Ok(Json(DiagnosisResponse::new(&result, image_url)))
}

/// Find the `file` field and read it fully
async fn extract_scan_upload(multipart: &mut Multipart) -> Result<ScanUpload, ApiErrorResponse> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!("Malformed multipart body: {}", e);
        ApiErrorResponse(ApiError::InvalidRequest(format!(
            "Malformed multipart body: {}",
            e
        )))
    })? {
        if field.name() == Some("file") {
            let filename = field.file_name().map(|name| name.to_string());
            let data = field.bytes().await.map_err(|e| {
                ApiErrorResponse(ApiError::InvalidRequest(format!(
                    "Failed to read upload: {}",
                    e
                )))
            })?;
            return Ok(ScanUpload {
                data: data.to_vec(),
                filename,
            });
        }
    }

    warn!("Predict request missing 'file' field");
    Err(ApiErrorResponse(ApiError::ValidationError {
        field: "file".to_string(),
        message: "A scan upload is required".to_string(),
    }))
}

/// Store the upload under a random six-digit name and return its URL
///
/// The stored extension comes from the client filename when it has one,
/// otherwise from the detected container format.
async fn save_upload(static_dir: &Path, upload: &ScanUpload) -> anyhow::Result<String> {
    let extension = upload
        .filename
        .as_deref()
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_string())
        .unwrap_or_else(|| {
            detect_format(&upload.data)
                .map(format_to_extension)
                .unwrap_or("bin")
                .to_string()
        });

    let stored_name = format!(
        "{}.{}",
        rand::thread_rng().gen_range(100_000..=999_999),
        extension
    );
    let path = static_dir.join(&stored_name);

    tokio::fs::write(&path, &upload.data)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    debug!("Stored upload at {}", path.display());

    Ok(format!("/static/{}", stored_name))
}
