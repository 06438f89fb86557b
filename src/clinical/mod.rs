// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Clinical terminology reference
//!
//! Maps predicted diagnosis labels onto WHO ICD-10/11 codes and AYUSH
//! (Ayurveda, Siddha, Unani) classifications from a bundled table.

pub mod database;
pub mod entry;

pub use database::{
    AyushResolution, ClinicalDatabase, CodeResolution, SOURCE_CLINICAL_DATABASE, SOURCE_FALLBACK,
    UNCLASSIFIED_ICD,
};
pub use entry::{
    AyurvedaClassification, ClinicalEntry, Icd10Entry, Icd11Entry, InstitutionalEntry,
    SiddhaClassification, UnaniClassification,
};
