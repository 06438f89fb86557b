// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Diagnostic expert wrapper
//!
//! An [`ExpertModel`] pairs a definition with whatever classifier state could
//! be established at startup. Inference never fails from the caller's point
//! of view: a degraded expert, or a loaded one whose real inference errors,
//! answers from the simulation path instead.

use anyhow::{anyhow, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::clinical::ClinicalDatabase;
use crate::imaging::decode_scan;

use super::architecture::Architecture;
use super::classifier::OnnxClassifier;
use super::definition::ExpertDefinition;
use super::preprocessing::preprocess_scan;

/// Which engine produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    /// A loaded ONNX session scored the scan
    Onnx,
    /// The simulation path answered
    Simulated,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Onnx => "onnx-runtime",
            EngineKind::Simulated => "simulation",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why an expert could not establish a real classifier session
#[derive(Debug, Clone)]
pub enum DegradedReason {
    /// No weights file at the expected path
    WeightsMissing { path: PathBuf },
    /// The weights file exists but the session could not be built
    LoadFailed(String),
}

impl fmt::Display for DegradedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradedReason::WeightsMissing { path } => {
                write!(f, "weights missing at {}", path.display())
            }
            DegradedReason::LoadFailed(msg) => write!(f, "load failed: {}", msg),
        }
    }
}

/// Classifier availability for one expert
#[derive(Debug, Clone)]
pub enum ModelState {
    Loaded(OnnxClassifier),
    Degraded(DegradedReason),
}

impl ModelState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ModelState::Loaded(_))
    }

    /// Status string as shown on the models endpoint
    pub fn status_label(&self) -> String {
        match self {
            ModelState::Loaded(_) => "loaded".to_string(),
            ModelState::Degraded(reason) => format!("degraded ({})", reason),
        }
    }
}

/// One completed inference
#[derive(Debug, Clone)]
pub struct InferenceResult {
    /// Predicted diagnosis label
    pub prediction: String,
    /// Confidence, rounded to 4 decimal places
    pub confidence: f32,
    /// Backbone that notionally (or actually) produced the prediction
    pub architecture: Architecture,
    /// Resolved ICD-10 code
    pub icd_code: String,
    /// Resolved AYUSH term
    pub ayush_code: String,
    /// Path the expert's weights live at (whether or not they loaded)
    pub weights_path: PathBuf,
    /// Engine that produced this result
    pub engine: EngineKind,
}

/// A single anatomy's diagnostic expert
#[derive(Debug, Clone)]
pub struct ExpertModel {
    definition: ExpertDefinition,
    weights_path: PathBuf,
    state: ModelState,
    clinical: Arc<ClinicalDatabase>,
    simulation_delay: Duration,
}

impl ExpertModel {
    /// Initialize an expert, attempting to load its classifier weights
    ///
    /// Never fails: a missing or unreadable weights file leaves the expert in
    /// a degraded state that answers via simulation.
    pub async fn load(
        definition: ExpertDefinition,
        weights_dir: &Path,
        clinical: Arc<ClinicalDatabase>,
        simulation_delay: Duration,
    ) -> Self {
        let weights_path = weights_dir.join(&definition.weight_file);

        info!(
            "Initializing {} node with {} weights from {}",
            definition.name,
            definition.architecture,
            weights_path.display()
        );

        let state = if !weights_path.exists() {
            warn!(
                "⚠️ Weights missing for {} at {}, expert will run in simulation mode",
                definition.name,
                weights_path.display()
            );
            ModelState::Degraded(DegradedReason::WeightsMissing {
                path: weights_path.clone(),
            })
        } else {
            match OnnxClassifier::new(&weights_path, definition.classes.len()).await {
                Ok(classifier) => {
                    info!("✅ {} ready ({})", definition.name, definition.architecture);
                    ModelState::Loaded(classifier)
                }
                Err(e) => {
                    warn!(
                        "⚠️ Could not load weights for {}: {}. Expert will run in simulation mode",
                        definition.name, e
                    );
                    ModelState::Degraded(DegradedReason::LoadFailed(e.to_string()))
                }
            }
        };

        Self {
            definition,
            weights_path,
            state,
            clinical,
            simulation_delay,
        }
    }

    pub fn definition(&self) -> &ExpertDefinition {
        &self.definition
    }

    pub fn state(&self) -> &ModelState {
        &self.state
    }

    pub fn weights_path(&self) -> &Path {
        &self.weights_path
    }

    /// Run the expert against raw scan bytes
    ///
    /// Always produces a result. Real inference is attempted when a session
    /// is loaded; any failure there (undecodable scan, session error, class
    /// index out of range) is absorbed into the simulation path.
    pub async fn forward(&self, image: &[u8]) -> InferenceResult {
        let (prediction, confidence, engine) = match &self.state {
            ModelState::Loaded(classifier) => match self.classify_scan(classifier, image) {
                Ok((label, confidence)) => (label, confidence, EngineKind::Onnx),
                Err(e) => {
                    warn!(
                        "Real inference failed for {}: {}. Falling back to simulation",
                        self.definition.name, e
                    );
                    let (label, confidence) = self.simulate().await;
                    (label, confidence, EngineKind::Simulated)
                }
            },
            ModelState::Degraded(reason) => {
                debug!(
                    "{} is degraded ({}), answering via simulation",
                    self.definition.name, reason
                );
                let (label, confidence) = self.simulate().await;
                (label, confidence, EngineKind::Simulated)
            }
        };

        let (icd_code, ayush_code) = self.resolve_label(&prediction);

        InferenceResult {
            prediction,
            confidence,
            architecture: self.definition.architecture,
            icd_code,
            ayush_code,
            weights_path: self.weights_path.clone(),
            engine,
        }
    }

    /// Decode, preprocess and score a scan with the loaded session
    fn classify_scan(&self, classifier: &OnnxClassifier, image: &[u8]) -> Result<(String, f32)> {
        let (scan, scan_info) = decode_scan(image)?;
        debug!(
            "Decoded scan: {}x{}, {} bytes ({:?})",
            scan_info.width, scan_info.height, scan_info.size_bytes, scan_info.format
        );

        let tensor = preprocess_scan(&scan, self.definition.architecture);
        let classification = classifier.classify(&tensor)?;

        let label = self
            .definition
            .classes
            .get(classification.class_index)
            .ok_or_else(|| {
                anyhow!(
                    "Class index {} out of range for {} labels",
                    classification.class_index,
                    self.definition.classes.len()
                )
            })?
            .clone();

        let confidence = round_confidence(classification.probability);
        info!(
            "Real inference on {}: {} ({:.1}%)",
            self.definition.name,
            label,
            confidence * 100.0
        );

        Ok((label, confidence))
    }

    /// Simulated inference: uniform label pick with high mock confidence,
    /// after a delay that mimics real model latency
    async fn simulate(&self) -> (String, f32) {
        sleep(self.simulation_delay).await;

        let mut rng = rand::thread_rng();
        let label = self
            .definition
            .classes
            .choose(&mut rng)
            .cloned()
            .unwrap_or_else(|| "Normal".to_string());
        let confidence = round_confidence(rng.gen_range(0.92f32..=0.99f32));

        (label, confidence)
    }

    /// Resolve a predicted label to ICD and AYUSH codes
    ///
    /// The clinical reference table wins when it knows the label. Otherwise
    /// the expert's own maps answer, with their fixed defaults.
    fn resolve_label(&self, label: &str) -> (String, String) {
        if !self.definition.consult_reference {
            return (
                self.definition.icd_for(label),
                self.definition.ayush_for(label),
            );
        }

        let codes = self.clinical.resolve_codes(label);
        let ayush = self.clinical.resolve_ayurveda(label);

        let icd_code = if codes.is_fallback() {
            self.definition.icd_for(label)
        } else {
            codes.icd_code
        };
        let ayush_code = if ayush.is_fallback() {
            self.definition.ayush_for(label)
        } else {
            ayush.ayurveda_code
        };

        (icd_code, ayush_code)
    }
}

/// Round a confidence to 4 decimal places
pub(crate) fn round_confidence(value: f32) -> f32 {
    (value * 10_000.0).round() / 10_000.0
}
