// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ONNX Runtime classifier head
//!
//! Wraps one exported backbone session. Runs on CPU only so the node works on
//! commodity institutional hardware.

use anyhow::{Context, Result};
use ndarray::Array4;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// One classification over an expert's label set
#[derive(Debug, Clone, Copy)]
pub struct Classification {
    /// Index into the expert's class list
    pub class_index: usize,
    /// Softmax probability of that class (0.0-1.0)
    pub probability: f32,
}

/// A loaded classifier session
#[derive(Clone)]
pub struct OnnxClassifier {
    /// ONNX Runtime session (thread-safe)
    session: Arc<Mutex<Session>>,
    /// Model input name
    input_name: String,
    /// Number of classes the session must emit
    expected_classes: usize,
}

impl std::fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("input_name", &self.input_name)
            .field("expected_classes", &self.expected_classes)
            .finish_non_exhaustive()
    }
}

impl OnnxClassifier {
    /// Load a classifier session from an exported ONNX file
    ///
    /// # Arguments
    /// - `model_path`: Path to the .onnx weights export
    /// - `expected_classes`: Size of the label set the head was trained on
    ///
    /// # Errors
    /// Returns error if the file is missing, is not a readable ONNX graph, or
    /// `expected_classes` is zero.
    pub async fn new<P: AsRef<Path>>(model_path: P, expected_classes: usize) -> Result<Self> {
        let model_path = model_path.as_ref();

        if expected_classes == 0 {
            anyhow::bail!("Classifier needs at least one output class");
        }
        if !model_path.exists() {
            anyhow::bail!("Classifier weights not found: {}", model_path.display());
        }

        info!("Loading classifier weights from {}", model_path.display());

        // Load ONNX model with CPU-only execution
        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load classifier weights from {}",
                model_path.display()
            ))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "input".to_string());

        if let Some(input) = session.inputs.first() {
            debug!("Classifier expected input: {:?}", input.input_type);
        }

        info!("✅ Classifier loaded successfully (CPU-only)");

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            expected_classes,
        })
    }

    /// Classify a preprocessed scan tensor
    ///
    /// # Arguments
    /// - `input`: NCHW tensor [1, 3, H, W] from `preprocess_scan()`
    ///
    /// # Returns
    /// The argmax class with its softmax probability.
    pub fn classify(&self, input: &Array4<f32>) -> Result<Classification> {
        let shape = input.shape();
        if shape.len() != 4 || shape[0] != 1 || shape[1] != 3 {
            anyhow::bail!("Invalid input shape: {:?}, expected [1, 3, H, W]", shape);
        }

        let mut session = self.session.lock().unwrap();

        let input_value =
            Value::from_array(input.to_owned()).context("Failed to create input tensor")?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .context("Classifier inference failed")?;

        let output_tensor = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        let output_shape = output_tensor.shape();
        debug!("Classifier output shape: {:?}", output_shape);

        // Accept [1, num_classes] or flat [num_classes]
        let logits: Vec<f32> = match output_shape.len() {
            2 if output_shape[0] == 1 => output_tensor.iter().copied().collect(),
            1 => output_tensor.iter().copied().collect(),
            _ => anyhow::bail!("Unexpected output shape: {:?}", output_shape),
        };

        if logits.len() != self.expected_classes {
            anyhow::bail!(
                "Classifier emitted {} logits but the expert defines {} classes",
                logits.len(),
                self.expected_classes
            );
        }

        let (class_index, probability) = softmax_argmax(&logits);

        Ok(Classification {
            class_index,
            probability,
        })
    }
}

/// Softmax over raw logits, returning the argmax index and its probability.
/// Caller guarantees a non-empty slice.
fn softmax_argmax(logits: &[f32]) -> (usize, f32) {
    // Shift by the max logit for numerical stability
    let max_logit = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|l| (l - max_logit).exp()).collect();
    let sum: f32 = exps.iter().sum();

    let mut best_index = 0;
    let mut best_prob = 0.0f32;
    for (index, exp) in exps.iter().enumerate() {
        let prob = exp / sum;
        if prob > best_prob {
            best_prob = prob;
            best_index = index;
        }
    }

    (best_index, best_prob)
}
