// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Classifier backbone descriptors
//!
//! Each expert runs one of four backbones. The descriptor data (layer count,
//! parameter budget, input resolution) is reported on the models endpoint and
//! drives preprocessing.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;

/// The four classifier backbones deployed on the node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture {
    /// Compound-scaled CNN for high resolution skeletal radiographs
    EfficientNetB3,
    /// Densely connected CNN for thoracic radiographs
    DenseNet121,
    /// Residual CNN tuned for soft-tissue MRI contrast
    ResNet50Mri,
    /// Shifted-window transformer for CT volumes
    SwinTransformerCt,
}

impl Architecture {
    pub const ALL: [Architecture; 4] = [
        Architecture::EfficientNetB3,
        Architecture::DenseNet121,
        Architecture::ResNet50Mri,
        Architecture::SwinTransformerCt,
    ];

    /// Canonical identifier as reported in responses
    pub fn id(&self) -> &'static str {
        match self {
            Architecture::EfficientNetB3 => "EfficientNet-B3",
            Architecture::DenseNet121 => "DenseNet-121",
            Architecture::ResNet50Mri => "ResNet-50-MRI",
            Architecture::SwinTransformerCt => "Swin-Transformer-CT",
        }
    }

    /// Square input edge in pixels expected by the backbone
    pub fn input_resolution(&self) -> u32 {
        match self {
            Architecture::EfficientNetB3 => 300,
            _ => 224,
        }
    }

    /// Whether inputs are collapsed to grayscale before channel replication
    pub fn grayscale_input(&self) -> bool {
        matches!(self, Architecture::ResNet50Mri)
    }

    pub fn layers(&self) -> u32 {
        match self {
            Architecture::EfficientNetB3 => 28,
            Architecture::DenseNet121 => 121,
            Architecture::ResNet50Mri => 50,
            Architecture::SwinTransformerCt => 24,
        }
    }

    pub fn parameters(&self) -> &'static str {
        match self {
            Architecture::EfficientNetB3 => "12.3M",
            Architecture::DenseNet121 => "8.1M",
            Architecture::ResNet50Mri => "25.6M",
            Architecture::SwinTransformerCt => "87.8M",
        }
    }

    /// What the backbone was tuned for, as shown on the models endpoint
    pub fn optimization(&self) -> &'static str {
        match self {
            Architecture::EfficientNetB3 => "Skeletal-HighRes",
            Architecture::DenseNet121 => "Feature-Propagation",
            Architecture::ResNet50Mri => "Soft-Tissue-Contrast",
            Architecture::SwinTransformerCt => "Volumetric-Attention",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Architecture {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EfficientNet-B3" => Ok(Architecture::EfficientNetB3),
            "DenseNet-121" => Ok(Architecture::DenseNet121),
            "ResNet-50-MRI" => Ok(Architecture::ResNet50Mri),
            "Swin-Transformer-CT" => Ok(Architecture::SwinTransformerCt),
            other => bail!("Unrecognized architecture id: '{}'", other),
        }
    }
}
