// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod clinical;
pub mod experts;
pub mod imaging;
pub mod routing;
pub mod setup;

// Re-export the types most callers wire together at startup
pub use clinical::{ClinicalDatabase, CodeResolution};
pub use experts::{
    Architecture, EngineKind, ExpertDefinition, ExpertModel, ExpertRegistry, InferenceResult,
    ModelState, RegistryConfig,
};
pub use routing::{Anatomy, DiagnosticRouter, OrchestrationResult};
