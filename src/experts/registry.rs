// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Expert registry: loads and owns the four diagnostic experts

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::clinical::ClinicalDatabase;
use crate::routing::Anatomy;

use super::definition::ExpertDefinition;
use super::expert::ExpertModel;

/// Configuration for loading the expert registry
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Directory holding the .onnx weight exports
    pub weights_dir: PathBuf,
    /// Delay applied by the simulation path, mimicking real model latency
    pub simulation_delay: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            weights_dir: PathBuf::from("weights"),
            simulation_delay: Duration::from_millis(800),
        }
    }
}

/// Expert metadata as reported on the models endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpertInfo {
    /// Expert name, e.g. "Knee OA Expert"
    pub name: String,
    /// Anatomy route key (knee, chest, mri, ct)
    pub anatomy: String,
    /// Backbone identifier
    pub architecture: String,
    /// Square input edge in pixels
    pub input_resolution: u32,
    pub layers: u32,
    pub parameters: String,
    pub optimization: String,
    /// Output labels in model class order
    pub classes: Vec<String>,
    /// "loaded" or a degraded reason
    pub status: String,
    /// Where the weights live (whether or not they loaded)
    pub weights: String,
}

/// Owns one [`ExpertModel`] per anatomy
///
/// Loading never fails; experts whose weights are absent or unreadable come
/// up degraded and answer via simulation.
#[derive(Debug, Clone)]
pub struct ExpertRegistry {
    knee: Arc<ExpertModel>,
    chest: Arc<ExpertModel>,
    mri: Arc<ExpertModel>,
    ct: Arc<ExpertModel>,
}

impl ExpertRegistry {
    /// Load all four experts against a shared clinical reference
    pub async fn load(config: RegistryConfig, clinical: Arc<ClinicalDatabase>) -> Self {
        info!(
            "🚀 Loading diagnostic experts from {}",
            config.weights_dir.display()
        );

        let knee = ExpertModel::load(
            ExpertDefinition::knee(),
            &config.weights_dir,
            clinical.clone(),
            config.simulation_delay,
        )
        .await;
        let chest = ExpertModel::load(
            ExpertDefinition::chest(),
            &config.weights_dir,
            clinical.clone(),
            config.simulation_delay,
        )
        .await;
        let mri = ExpertModel::load(
            ExpertDefinition::mri(),
            &config.weights_dir,
            clinical.clone(),
            config.simulation_delay,
        )
        .await;
        let ct = ExpertModel::load(
            ExpertDefinition::ct(),
            &config.weights_dir,
            clinical,
            config.simulation_delay,
        )
        .await;

        let registry = Self {
            knee: Arc::new(knee),
            chest: Arc::new(chest),
            mri: Arc::new(mri),
            ct: Arc::new(ct),
        };

        info!(
            "Expert registry ready: {}/4 classifiers loaded, rest in simulation mode",
            registry.loaded_count()
        );

        registry
    }

    /// The expert responsible for an anatomy. Total: every anatomy has one.
    pub fn expert(&self, anatomy: Anatomy) -> &Arc<ExpertModel> {
        match anatomy {
            Anatomy::Knee => &self.knee,
            Anatomy::Chest => &self.chest,
            Anatomy::Mri => &self.mri,
            Anatomy::Ct => &self.ct,
        }
    }

    /// All experts in route-key order
    pub fn all(&self) -> [&Arc<ExpertModel>; 4] {
        [&self.knee, &self.chest, &self.mri, &self.ct]
    }

    /// Number of experts with a real classifier session
    pub fn loaded_count(&self) -> usize {
        self.all()
            .iter()
            .filter(|expert| expert.state().is_loaded())
            .count()
    }

    /// Metadata for every expert, for the models endpoint
    pub fn list_experts(&self) -> Vec<ExpertInfo> {
        Anatomy::ALL
            .iter()
            .map(|&anatomy| {
                let expert = self.expert(anatomy);
                let definition = expert.definition();
                ExpertInfo {
                    name: definition.name.clone(),
                    anatomy: anatomy.key().to_string(),
                    architecture: definition.architecture.id().to_string(),
                    input_resolution: definition.architecture.input_resolution(),
                    layers: definition.architecture.layers(),
                    parameters: definition.architecture.parameters().to_string(),
                    optimization: definition.architecture.optimization().to_string(),
                    classes: definition.classes.clone(),
                    status: expert.state().status_label(),
                    weights: expert.weights_path().display().to_string(),
                }
            })
            .collect()
    }
}
