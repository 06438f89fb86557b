// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Predict API endpoint module
//!
//! Provides the four scan-upload routes (chest, knee, MRI, CT) that feed the
//! diagnostic orchestrator.

pub mod handler;
pub mod response;

pub use handler::{predict_chest, predict_ct, predict_knee, predict_mri};
pub use response::{DiagnosisResponse, InfoSections, LabelScore, TableSection, TextSection};
