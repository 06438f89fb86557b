// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Clinical reference resolution tests
//!
//! These tests verify that:
//! - Known diagnoses resolve from the bundled table with full confidence
//! - Unknown diagnoses fall back to the unclassified ICD code
//! - Lookup ignores letter case
//! - Ayurveda resolution carries all four tradition blocks
//! - Entries serialize with the UI's wire keys

use ayush_diagnostic_node::clinical::{
    ClinicalDatabase, SOURCE_CLINICAL_DATABASE, SOURCE_FALLBACK, UNCLASSIFIED_ICD,
};

#[cfg(test)]
mod code_resolution_tests {
    use super::*;

    /// Test 1: Known diagnosis resolves from the table
    #[test]
    fn test_known_diagnosis_resolves_from_table() {
        let db = ClinicalDatabase::bundled();
        let resolution = db.resolve_codes("Severe Osteoarthritis");

        assert_eq!(resolution.icd_code, "M17.13");
        assert_eq!(resolution.confidence, 0.95);
        assert_eq!(resolution.severity, "Severe");
        assert_eq!(resolution.source, SOURCE_CLINICAL_DATABASE);
        assert!(!resolution.is_fallback());
    }

    /// Test 2: Unknown diagnosis falls back to the unclassified code
    #[test]
    fn test_unknown_diagnosis_falls_back() {
        let db = ClinicalDatabase::bundled();
        let resolution = db.resolve_codes("Glioma Pattern");

        assert_eq!(resolution.icd_code, UNCLASSIFIED_ICD);
        assert_eq!(resolution.confidence, 0.0);
        assert_eq!(resolution.source, SOURCE_FALLBACK);
        assert!(resolution.is_fallback());
    }

    /// Test 3: Lookup ignores letter case
    #[test]
    fn test_lookup_ignores_case() {
        let db = ClinicalDatabase::bundled();

        let entry = db.lookup("tUBERCULOSIS").expect("should match by name");
        assert_eq!(entry.name_english, "Tuberculosis");
        assert_eq!(entry.institutional_entry.code, 513);
    }

    /// Test 4: Ayurveda resolution carries all four tradition blocks
    #[test]
    fn test_ayurveda_resolution_carries_tradition_blocks() {
        let db = ClinicalDatabase::bundled();
        let resolution = db.resolve_ayurveda("Brain Tumor");

        assert_eq!(resolution.ayurveda_code, "Mastishka Granthi");
        assert_eq!(resolution.severity, "Malignant");
        assert!(resolution.siddha.is_some());
        assert!(resolution.unani.is_some());
        assert!(resolution.who_icd10.is_some());
        assert!(resolution.who_icd11.is_some());
        assert!(!resolution.is_fallback());

        let entry = resolution.full_entry.expect("hit should carry the entry");
        assert_eq!(entry.sr_no, 6);
        assert_eq!(entry.institutional_entry.code, 518);
    }

    /// Test 5: Ayurveda fallback has no tradition blocks
    #[test]
    fn test_ayurveda_fallback_is_empty() {
        let db = ClinicalDatabase::bundled();
        let resolution = db.resolve_ayurveda("Degenerative Disc");

        assert!(resolution.is_fallback());
        assert!(resolution.siddha.is_none());
        assert!(resolution.full_entry.is_none());
    }

    /// Test 6: Entries serialize with the UI's wire keys
    #[test]
    fn test_entry_serializes_with_ui_keys() {
        let db = ClinicalDatabase::bundled();
        let entry = db.lookup("Tuberculosis").unwrap();

        let value = serde_json::to_value(entry).unwrap();
        assert!(value.get("nameEnglish").is_some());
        assert!(value.get("srNo").is_some());
        assert!(value.get("who_icd10").is_some());
        assert!(value.get("who_icd11").is_some());
        assert!(value["institutionalEntry"].get("nameDevnagari").is_some());
    }
}
