// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Diagnosis response types
//!
//! The wire shape is consumed by the institutional UI, so the key names are
//! fixed, including the two snake_case holdouts `original_url` and
//! `all_results` and the upper-case info section titles.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::experts::expert::round_confidence;
use crate::routing::OrchestrationResult;

/// One label with its confidence, for the differential list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub confidence: f32,
}

/// A tabular info section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSection {
    #[serde(rename = "type")]
    pub kind: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// A free-text info section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSection {
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
}

/// The info panel blocks shown under the diagnosis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoSections {
    #[serde(rename = "AYURVEDA CLASSIFICATION")]
    pub ayurveda_classification: TableSection,
    #[serde(rename = "INSTITUTIONAL LOG")]
    pub institutional_log: TextSection,
}

/// Response from a predict endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisResponse {
    /// Report id, "CCRAS-L-" plus five random digits
    pub id: String,
    /// Predicted diagnosis label
    pub prediction: String,
    /// Confidence, rounded to 4 decimal places
    pub confidence: f32,
    /// Resolved ICD-10 code
    pub icd_code: String,
    /// Narrative assembled from router, expert and prediction
    pub radiological_observation: String,
    /// Backbone identifier, e.g. "DenseNet-121"
    pub model_architecture: String,
    /// Anatomy tag, e.g. "CHEST Structure"
    pub detected_anatomy: String,
    /// Engine that produced the result ("onnx-runtime" or "simulation")
    pub engine: String,
    /// URL the uploaded scan was stored under
    #[serde(rename = "original_url")]
    pub original_url: String,
    /// Predicted label plus its "Healthy/Normal" complement
    #[serde(rename = "all_results")]
    pub all_results: Vec<LabelScore>,
    pub info: InfoSections,
}

impl DiagnosisResponse {
    /// Assemble the UI response from an orchestration result
    pub fn new(result: &OrchestrationResult, image_url: String) -> Self {
        let inference = &result.inference;
        let architecture = inference.architecture.id();

        let id = format!(
            "CCRAS-L-{}",
            rand::thread_rng().gen_range(10_000..=99_999)
        );

        let radiological_observation = format!(
            "Routing: {} -> Expert: {}. Anatomy: {}. \
             Observations suggest features consistent with {}.",
            result.router, architecture, result.detected_anatomy, inference.prediction
        );

        let all_results = vec![
            LabelScore {
                label: inference.prediction.clone(),
                confidence: inference.confidence,
            },
            LabelScore {
                label: "Healthy/Normal".to_string(),
                confidence: round_confidence(1.0 - inference.confidence),
            },
        ];

        let info = InfoSections {
            ayurveda_classification: TableSection {
                kind: "table".to_string(),
                columns: vec![
                    "Sr No.".to_string(),
                    "Code".to_string(),
                    "Clinical Term".to_string(),
                    "Research Mapping".to_string(),
                ],
                rows: vec![vec![
                    "1".to_string(),
                    "AY-INT-01".to_string(),
                    inference.ayush_code.clone(),
                    format!("Hierarchical classification via {}.", architecture),
                ]],
            },
            institutional_log: TextSection {
                kind: "text".to_string(),
                content: format!(
                    "Inference complete on CCRAS Local Node. Weights loaded: {}.",
                    inference.weights_path.display()
                ),
            },
        };

        Self {
            id,
            prediction: inference.prediction.clone(),
            confidence: inference.confidence,
            icd_code: inference.icd_code.clone(),
            radiological_observation,
            model_architecture: architecture.to_string(),
            detected_anatomy: result.detected_anatomy.clone(),
            engine: inference.engine.as_str().to_string(),
            original_url: image_url,
            all_results,
            info,
        }
    }
}
