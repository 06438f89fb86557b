// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Stage-1 anatomy routing and inference orchestration
//!
//! Routing is a substring match over the scan type string, in a fixed
//! precedence order. The chest expert doubles as the route of last resort:
//! any scan type the router does not recognize lands there.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::experts::{ExpertRegistry, InferenceResult};

/// Identifier of the stage-1 router, reported with every result
pub const ROUTER_ID: &str = "Anatomy-Router-v2.5";

/// The anatomies the node can route to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anatomy {
    Knee,
    Chest,
    Mri,
    Ct,
}

impl Anatomy {
    pub const ALL: [Anatomy; 4] = [Anatomy::Knee, Anatomy::Chest, Anatomy::Mri, Anatomy::Ct];

    /// Route a scan type string to an anatomy
    ///
    /// Matching is case sensitive and ordered: "Knee" beats "MRI" beats
    /// "CT". Everything else, including unrecognized strings, routes to
    /// chest.
    pub fn from_scan_type(scan_type: &str) -> Self {
        if scan_type.contains("Knee") {
            Anatomy::Knee
        } else if scan_type.contains("MRI") {
            Anatomy::Mri
        } else if scan_type.contains("CT") {
            Anatomy::Ct
        } else {
            Anatomy::Chest
        }
    }

    /// Route key, also the anatomy name in expert listings
    pub fn key(&self) -> &'static str {
        match self {
            Anatomy::Knee => "knee",
            Anatomy::Chest => "chest",
            Anatomy::Mri => "mri",
            Anatomy::Ct => "ct",
        }
    }

    /// Anatomy tag as reported in responses, e.g. "KNEE Structure"
    pub fn structure_tag(&self) -> String {
        format!("{} Structure", self.key().to_uppercase())
    }
}

impl fmt::Display for Anatomy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// An expert's result plus the routing metadata around it
#[derive(Debug, Clone)]
pub struct OrchestrationResult {
    pub inference: InferenceResult,
    /// Anatomy tag, e.g. "CHEST Structure"
    pub detected_anatomy: String,
    /// Always [`ROUTER_ID`]
    pub router: &'static str,
    /// When the inference completed
    pub timestamp: DateTime<Utc>,
}

/// Two-stage diagnostic orchestrator: route, then run the expert
#[derive(Debug, Clone)]
pub struct DiagnosticRouter {
    registry: Arc<ExpertRegistry>,
}

impl DiagnosticRouter {
    pub fn new(registry: Arc<ExpertRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ExpertRegistry> {
        &self.registry
    }

    /// Route the scan type to an expert and run it on the scan bytes
    pub async fn run_inference(
        &self,
        image: &[u8],
        scan_type: &str,
    ) -> Result<OrchestrationResult> {
        let anatomy = Anatomy::from_scan_type(scan_type);
        if anatomy == Anatomy::Chest && !scan_type.contains("Chest") {
            debug!(
                "Scan type '{}' not recognized, routing to chest expert",
                scan_type
            );
        }

        let expert = self.registry.expert(anatomy);
        debug!(
            "Routing '{}' to {} ({})",
            scan_type,
            expert.definition().name,
            anatomy
        );

        let inference = expert.forward(image).await;

        Ok(OrchestrationResult {
            inference,
            detected_anatomy: anatomy.structure_tag(),
            router: ROUTER_ID,
            timestamp: Utc::now(),
        })
    }
}
