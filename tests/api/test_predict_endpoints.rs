// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Predict endpoint tests for the four scan routes
//!
//! These tests verify that:
//! - Each route reaches its own expert and reports its architecture
//! - The response carries the full UI contract (id, codes, narrative, info)
//! - Uploads are persisted under /static with their original extension
//! - A missing file field is rejected with a validation error
//! - Undecodable scans still produce a simulated diagnosis
//!
//! All experts run degraded here (no weights on disk), so every diagnosis
//! comes from the simulation engine with zero delay.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use ayush_diagnostic_node::{
    api::{build_router, AppState},
    clinical::ClinicalDatabase,
    experts::{ExpertRegistry, RegistryConfig},
    routing::DiagnosticRouter,
};
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tempfile::TempDir;
use tower::util::ServiceExt;

const BOUNDARY: &str = "X-BOUNDARY";

/// Helper: AppState whose experts all run in simulation mode
async fn degraded_state(dir: &TempDir) -> AppState {
    let static_dir = dir.path().join("static");
    std::fs::create_dir_all(&static_dir).unwrap();

    let clinical = Arc::new(ClinicalDatabase::bundled());
    let config = RegistryConfig {
        weights_dir: dir.path().join("weights"),
        simulation_delay: Duration::ZERO,
    };
    let registry = Arc::new(ExpertRegistry::load(config, clinical).await);

    AppState {
        router: Arc::new(DiagnosticRouter::new(registry)),
        static_dir,
    }
}

/// Helper: a small valid PNG scan
fn png_scan() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(64, 64, image::Rgb([90, 90, 90]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();
    bytes
}

/// Helper: multipart POST with a single form field
fn multipart_request(uri: &str, field: &str, filename: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}

#[cfg(test)]
mod predict_endpoint_tests {
    use super::*;

    /// Test 1: Chest route returns the full diagnosis contract
    #[tokio::test]
    async fn test_chest_predict_full_contract() {
        let dir = TempDir::new().unwrap();
        let app = build_router(degraded_state(&dir).await);

        let request = multipart_request("/predict-xray/chest", "file", "scan.png", &png_scan());
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response_json(response).await;

        let id = body["id"].as_str().unwrap();
        assert!(id.starts_with("CCRAS-L-"), "got id {}", id);

        let chest_classes = [
            "Normal",
            "Tuberculosis",
            "Pneumonia",
            "Plural Effusion",
            "Cardiomegaly",
            "Others",
        ];
        let prediction = body["prediction"].as_str().unwrap();
        assert!(
            chest_classes.contains(&prediction),
            "Prediction '{}' should be a chest class",
            prediction
        );

        let confidence = body["confidence"].as_f64().unwrap();
        assert!(
            (0.9199..=0.9901).contains(&confidence),
            "Simulated confidence {} outside band",
            confidence
        );

        assert_eq!(body["modelArchitecture"], "DenseNet-121");
        assert_eq!(body["detectedAnatomy"], "CHEST Structure");
        assert_eq!(body["engine"], "simulation");
        assert!(!body["icdCode"].as_str().unwrap().is_empty());

        let observation = body["radiologicalObservation"].as_str().unwrap();
        assert!(observation.starts_with("Routing: Anatomy-Router-v2.5 -> Expert: DenseNet-121."));
        assert!(observation.contains(prediction));

        let all_results = body["all_results"].as_array().unwrap();
        assert_eq!(all_results.len(), 2);
        assert_eq!(all_results[1]["label"], "Healthy/Normal");

        assert!(body["info"].get("AYURVEDA CLASSIFICATION").is_some());
        assert!(body["info"].get("INSTITUTIONAL LOG").is_some());
    }

    /// Test 2: Knee route reaches the knee expert
    #[tokio::test]
    async fn test_knee_route_uses_knee_expert() {
        let dir = TempDir::new().unwrap();
        let app = build_router(degraded_state(&dir).await);

        let request = multipart_request("/predict-xray/knee", "file", "knee.png", &png_scan());
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response_json(response).await;
        assert_eq!(body["modelArchitecture"], "EfficientNet-B3");
        assert_eq!(body["detectedAnatomy"], "KNEE Structure");

        let knee_classes = ["Normal", "Mild Osteoarthritis", "Severe Osteoarthritis"];
        assert!(knee_classes.contains(&body["prediction"].as_str().unwrap()));
    }

    /// Test 3: MRI and CT routes reach their experts
    #[tokio::test]
    async fn test_mri_and_ct_routes() {
        let dir = TempDir::new().unwrap();
        let state = degraded_state(&dir).await;

        let request = multipart_request("/predict-mri", "file", "brain.png", &png_scan());
        let response = build_router(state.clone()).oneshot(request).await.unwrap();
        let body = response_json(response).await;
        assert_eq!(body["modelArchitecture"], "ResNet-50-MRI");
        assert_eq!(body["detectedAnatomy"], "MRI Structure");

        let request = multipart_request("/predict-ct", "file", "head.png", &png_scan());
        let response = build_router(state).oneshot(request).await.unwrap();
        let body = response_json(response).await;
        assert_eq!(body["modelArchitecture"], "Swin-Transformer-CT");
        assert_eq!(body["detectedAnatomy"], "CT Structure");
    }

    /// Test 4: Uploads are persisted under /static with their extension
    #[tokio::test]
    async fn test_upload_is_persisted() {
        let dir = TempDir::new().unwrap();
        let state = degraded_state(&dir).await;
        let static_dir = state.static_dir.clone();
        let app = build_router(state);

        let scan = png_scan();
        let request = multipart_request("/predict-xray/chest", "file", "scan.png", &scan);
        let response = app.oneshot(request).await.unwrap();
        let body = response_json(response).await;

        let url = body["original_url"].as_str().unwrap();
        assert!(url.starts_with("/static/"), "got url {}", url);
        assert!(url.ends_with(".png"), "got url {}", url);

        let stored = static_dir.join(url.trim_start_matches("/static/"));
        assert_eq!(std::fs::read(stored).unwrap(), scan);
    }

    /// Test 5: Missing file field is rejected with a validation error
    #[tokio::test]
    async fn test_missing_file_field_is_rejected() {
        let dir = TempDir::new().unwrap();
        let app = build_router(degraded_state(&dir).await);

        let request = multipart_request("/predict-xray/chest", "scan", "scan.png", &png_scan());
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response_json(response).await;
        assert_eq!(body["error_type"], "validation_error");
        assert_eq!(body["details"]["field"], "file");
    }

    /// Test 6: Undecodable scans still produce a simulated diagnosis
    #[tokio::test]
    async fn test_undecodable_scan_still_diagnosed() {
        let dir = TempDir::new().unwrap();
        let app = build_router(degraded_state(&dir).await);

        let request =
            multipart_request("/predict-xray/chest", "file", "junk.bin", b"not an image at all");
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response_json(response).await;
        assert_eq!(body["engine"], "simulation");
        assert!(!body["prediction"].as_str().unwrap().is_empty());
    }
}
