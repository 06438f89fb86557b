// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Clinical terminology record types
//!
//! One [`ClinicalEntry`] carries a diagnosis across every coding system the
//! node reports on: the institutional AYUSH registry, Siddha, Unani, and the
//! WHO ICD-10 / ICD-11 releases.

use serde::{Deserialize, Serialize};

/// Institutional registry entry (Devanagari term plus numeric code)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionalEntry {
    pub code: u32,
    pub name_devnagari: String,
    pub name_term: String,
    pub description: String,
}

/// Ayurveda classification for a diagnosis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AyurvedaClassification {
    pub term: String,
    pub description: String,
}

/// Siddha classification, with the Tamil term and its translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiddhaClassification {
    pub code: String,
    pub term: String,
    pub word: String,
    pub translation: String,
}

/// Unani classification, with the Arabic term and its translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnaniClassification {
    pub code: String,
    pub word: String,
    pub arabic_term: String,
    pub translation: String,
    pub description: String,
}

/// WHO ICD-10 coordinates for a diagnosis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Icd10Entry {
    /// Chapter numeral, e.g. "XIII"
    pub chapter: String,
    /// Block range, e.g. "M15-M19"
    pub block: String,
    /// The billable code, e.g. "M17.13"
    pub code: String,
    /// Full clinical wording for the code
    pub word: String,
}

/// WHO ICD-11 coordinates for a diagnosis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Icd11Entry {
    pub entity_id: String,
    pub code: String,
    pub term: String,
    pub description: String,
}

/// A single diagnosis mapped across all supported coding systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalEntry {
    /// Position in the bundled reference table (1-based)
    pub sr_no: u32,
    /// English diagnosis name, the lookup key
    pub name_english: String,
    /// Severity grade, e.g. "Mild", "Severe", "Malignant"
    pub severity: String,
    pub institutional_entry: InstitutionalEntry,
    pub ayurveda: AyurvedaClassification,
    pub siddha: SiddhaClassification,
    pub unani: UnaniClassification,
    #[serde(rename = "who_icd10")]
    pub who_icd10: Icd10Entry,
    #[serde(rename = "who_icd11")]
    pub who_icd11: Icd11Entry,
}
