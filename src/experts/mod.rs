// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Diagnostic expert models
//!
//! This module provides:
//! - Per-anatomy expert wrappers over ONNX classifier sessions
//! - Scan preprocessing for each backbone
//! - A registry that loads everything at startup
//!
//! All classifiers run on CPU only.

pub mod architecture;
pub mod classifier;
pub mod definition;
pub mod expert;
pub mod preprocessing;
pub mod registry;

pub use architecture::Architecture;
pub use classifier::{Classification, OnnxClassifier};
pub use definition::{ExpertDefinition, DEFAULT_AYUSH_TERM, DEFAULT_ICD_CODE};
pub use expert::{DegradedReason, EngineKind, ExpertModel, InferenceResult, ModelState};
pub use preprocessing::{preprocess_scan, MEAN, STD};
pub use registry::{ExpertInfo, ExpertRegistry, RegistryConfig};
