// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Compiled-in expert definitions
//!
//! One definition per anatomy: the backbone, the label set the head was
//! trained on, per-label coding maps, and the weights filename. The class
//! lists must match the exported model's output order exactly.

use std::collections::HashMap;

use super::architecture::Architecture;

/// ICD code used when a label is absent from the expert's own map
/// ("Encounter for general adult medical examination")
pub const DEFAULT_ICD_CODE: &str = "Z00.0";

/// AYUSH term used when a label is absent from the expert's own map
pub const DEFAULT_AYUSH_TERM: &str = "Swastha";

/// Static configuration for one diagnostic expert
#[derive(Debug, Clone)]
pub struct ExpertDefinition {
    /// Human readable expert name, e.g. "Knee OA Expert"
    pub name: String,
    /// Backbone the head was trained on
    pub architecture: Architecture,
    /// Output labels in the model's class order
    pub classes: Vec<String>,
    /// Per-label ICD-10 codes
    pub icd_codes: HashMap<String, String>,
    /// Per-label AYUSH terms
    pub ayush_terms: HashMap<String, String>,
    /// Weights filename under the weights directory
    pub weight_file: String,
    /// Whether predictions are resolved against the clinical reference
    /// table before falling back to the maps above
    pub consult_reference: bool,
}

fn string_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(label, code)| (label.to_string(), code.to_string()))
        .collect()
}

impl ExpertDefinition {
    /// Knee osteoarthritis grading expert
    pub fn knee() -> Self {
        Self {
            name: "Knee OA Expert".to_string(),
            architecture: Architecture::EfficientNetB3,
            classes: vec![
                "Normal".to_string(),
                "Mild Osteoarthritis".to_string(),
                "Severe Osteoarthritis".to_string(),
            ],
            icd_codes: string_map(&[
                ("Normal", "Z00.0"),
                ("Mild Osteoarthritis", "M17.1"),
                ("Severe Osteoarthritis", "M17.0"),
            ]),
            ayush_terms: string_map(&[
                ("Normal", "Swastha"),
                ("Mild Osteoarthritis", "Sandhigata Vata (Grade 1)"),
                ("Severe Osteoarthritis", "Sandhigata Vata (Avastha)"),
            ]),
            weight_file: "knee_model.onnx".to_string(),
            consult_reference: true,
        }
    }

    /// Thoracic radiograph expert
    pub fn chest() -> Self {
        Self {
            name: "Chest Thoracic Expert".to_string(),
            architecture: Architecture::DenseNet121,
            classes: vec![
                "Normal".to_string(),
                "Tuberculosis".to_string(),
                "Pneumonia".to_string(),
                "Plural Effusion".to_string(),
                "Cardiomegaly".to_string(),
                "Others".to_string(),
            ],
            icd_codes: string_map(&[
                ("Normal", "Z00.0"),
                ("Tuberculosis", "A15.0"),
                ("Pneumonia", "J18.9"),
                ("Plural Effusion", "J90"),
                ("Cardiomegaly", "I51.7"),
                ("Others", "R50.9"),
            ]),
            ayush_terms: string_map(&[
                ("Normal", "Swastha"),
                ("Tuberculosis", "Rajayakshma"),
                ("Pneumonia", "Shwasa-Roga"),
                ("Plural Effusion", "Vata-Kaphaja Shwasa"),
                ("Cardiomegaly", "Hridroga"),
                ("Others", "Roga (Unspecified)"),
            ]),
            weight_file: "xray_model.onnx".to_string(),
            consult_reference: true,
        }
    }

    /// Neuro and soft-tissue MRI expert
    pub fn mri() -> Self {
        Self {
            name: "Neuro/Soft-Tissue Expert".to_string(),
            architecture: Architecture::ResNet50Mri,
            classes: vec![
                "T2 Hyperintensity".to_string(),
                "Glioma Pattern".to_string(),
                "Normal MRI".to_string(),
                "Degenerative Disc".to_string(),
            ],
            icd_codes: string_map(&[
                ("T2 Hyperintensity", "G35"),
                ("Glioma Pattern", "C71.9"),
                ("Normal MRI", "Z00.0"),
                ("Degenerative Disc", "M51.1"),
            ]),
            ayush_terms: string_map(&[
                ("T2 Hyperintensity", "Vata-Vyadhi"),
                ("Glioma Pattern", "Arbuda"),
                ("Normal MRI", "Swastha"),
                ("Degenerative Disc", "Gridhrasi"),
            ]),
            weight_file: "mri_model.onnx".to_string(),
            consult_reference: true,
        }
    }

    /// High resolution CT expert
    pub fn ct() -> Self {
        Self {
            name: "High-Res CT Expert".to_string(),
            architecture: Architecture::SwinTransformerCt,
            classes: vec![
                "Hemorrhage".to_string(),
                "Ischemic Stroke".to_string(),
                "Normal CT".to_string(),
                "Fracture".to_string(),
            ],
            icd_codes: string_map(&[
                ("Hemorrhage", "I61.9"),
                ("Ischemic Stroke", "I63.9"),
                ("Normal CT", "Z00.0"),
                ("Fracture", "S02.0"),
            ]),
            ayush_terms: string_map(&[
                ("Hemorrhage", "Raktapitta"),
                ("Ischemic Stroke", "Pakshaghata"),
                ("Normal CT", "Swastha"),
                ("Fracture", "Asthi-Bhanga"),
            ]),
            weight_file: "ct_model.onnx".to_string(),
            consult_reference: true,
        }
    }

    /// ICD code for a predicted label from this expert's own map
    pub fn icd_for(&self, label: &str) -> String {
        self.icd_codes
            .get(label)
            .cloned()
            .unwrap_or_else(|| DEFAULT_ICD_CODE.to_string())
    }

    /// AYUSH term for a predicted label from this expert's own map
    pub fn ayush_for(&self, label: &str) -> String {
        self.ayush_terms
            .get(label)
            .cloned()
            .unwrap_or_else(|| DEFAULT_AYUSH_TERM.to_string())
    }
}
