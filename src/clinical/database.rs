// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bundled clinical reference table and code resolution
//!
//! The node ships its terminology table compiled in, so code resolution works
//! identically on machines with no outbound network access. Lookups are
//! case-insensitive on the English diagnosis name.

use tracing::debug;

use super::entry::{
    AyurvedaClassification, ClinicalEntry, Icd10Entry, Icd11Entry, InstitutionalEntry,
    SiddhaClassification, UnaniClassification,
};

/// Source tag for codes resolved from the bundled reference table
pub const SOURCE_CLINICAL_DATABASE: &str = "clinical-database";
/// Source tag for codes synthesized when a diagnosis is not in the table
pub const SOURCE_FALLBACK: &str = "fallback";

/// ICD code returned when a diagnosis cannot be classified ("Fever, unspecified")
pub const UNCLASSIFIED_ICD: &str = "R50.9";

/// ICD-10 resolution for a predicted label
#[derive(Debug, Clone)]
pub struct CodeResolution {
    pub icd_code: String,
    pub description: String,
    pub confidence: f32,
    pub severity: String,
    /// Either [`SOURCE_CLINICAL_DATABASE`] or [`SOURCE_FALLBACK`]
    pub source: &'static str,
}

impl CodeResolution {
    pub fn is_fallback(&self) -> bool {
        self.source == SOURCE_FALLBACK
    }
}

/// AYUSH resolution for a predicted label
///
/// On a table hit every block is populated from the matching entry. On a miss
/// the code degrades to "Unknown" and the blocks are `None`.
#[derive(Debug, Clone)]
pub struct AyushResolution {
    pub ayurveda_code: String,
    pub ayurveda_description: String,
    pub severity: String,
    pub siddha: Option<SiddhaClassification>,
    pub unani: Option<UnaniClassification>,
    pub who_icd10: Option<Icd10Entry>,
    pub who_icd11: Option<Icd11Entry>,
    pub full_entry: Option<ClinicalEntry>,
}

impl AyushResolution {
    pub fn is_fallback(&self) -> bool {
        self.full_entry.is_none()
    }
}

/// The compiled-in terminology reference
#[derive(Debug, Clone)]
pub struct ClinicalDatabase {
    entries: Vec<ClinicalEntry>,
}

impl Default for ClinicalDatabase {
    fn default() -> Self {
        Self::bundled()
    }
}

impl ClinicalDatabase {
    /// Build the bundled six-entry reference table
    pub fn bundled() -> Self {
        Self {
            entries: vec![
                ClinicalEntry::normal(),
                ClinicalEntry::mild_osteoarthritis(),
                ClinicalEntry::moderate_osteoarthritis(),
                ClinicalEntry::severe_osteoarthritis(),
                ClinicalEntry::tuberculosis(),
                ClinicalEntry::brain_tumor(),
            ],
        }
    }

    /// All entries in table order
    pub fn entries(&self) -> &[ClinicalEntry] {
        &self.entries
    }

    /// Find a diagnosis by its English name, ignoring ASCII case
    pub fn lookup(&self, diagnosis: &str) -> Option<&ClinicalEntry> {
        self.entries
            .iter()
            .find(|entry| entry.name_english.eq_ignore_ascii_case(diagnosis))
    }

    /// Resolve a predicted label to its ICD-10 code
    ///
    /// A table hit reports the entry's code with fixed 0.95 confidence. A miss
    /// reports [`UNCLASSIFIED_ICD`] with zero confidence and the fallback
    /// source tag so callers can tell the two apart.
    pub fn resolve_codes(&self, diagnosis: &str) -> CodeResolution {
        if let Some(entry) = self.lookup(diagnosis) {
            return CodeResolution {
                icd_code: entry.who_icd10.code.clone(),
                description: entry.who_icd10.word.clone(),
                confidence: 0.95,
                severity: entry.severity.clone(),
                source: SOURCE_CLINICAL_DATABASE,
            };
        }

        debug!("No clinical entry for '{}', using fallback codes", diagnosis);
        CodeResolution {
            icd_code: UNCLASSIFIED_ICD.to_string(),
            description: "Unable to classify".to_string(),
            confidence: 0.0,
            severity: "Unknown".to_string(),
            source: SOURCE_FALLBACK,
        }
    }

    /// Resolve a predicted label to its AYUSH classification
    pub fn resolve_ayurveda(&self, diagnosis: &str) -> AyushResolution {
        if let Some(entry) = self.lookup(diagnosis) {
            return AyushResolution {
                ayurveda_code: entry.ayurveda.term.clone(),
                ayurveda_description: entry.ayurveda.description.clone(),
                severity: entry.severity.clone(),
                siddha: Some(entry.siddha.clone()),
                unani: Some(entry.unani.clone()),
                who_icd10: Some(entry.who_icd10.clone()),
                who_icd11: Some(entry.who_icd11.clone()),
                full_entry: Some(entry.clone()),
            };
        }

        AyushResolution {
            ayurveda_code: "Unknown".to_string(),
            ayurveda_description: "Unable to classify".to_string(),
            severity: "Unknown".to_string(),
            siddha: None,
            unani: None,
            who_icd10: None,
            who_icd11: None,
            full_entry: None,
        }
    }
}

impl ClinicalEntry {
    pub fn normal() -> Self {
        Self {
            sr_no: 1,
            name_english: "Normal".to_string(),
            severity: "Normal".to_string(),
            institutional_entry: InstitutionalEntry {
                code: 512,
                name_devnagari: "स्वस्थ".to_string(),
                name_term: "Swastha".to_string(),
                description: "A state of physiological and psychological equilibrium with no clinical pathology.".to_string(),
            },
            ayurveda: AyurvedaClassification {
                term: "Swastha".to_string(),
                description: "Equilibrium of Doshas, Agni, Dhatus, and Malas with a pleasant state of mind and senses.".to_string(),
            },
            siddha: SiddhaClassification {
                code: "S1".to_string(),
                term: "Udarpini".to_string(),
                word: "நோயற்ற நிலை".to_string(),
                translation: "Healthy State".to_string(),
            },
            unani: UnaniClassification {
                code: "U1".to_string(),
                word: "Sehat".to_string(),
                arabic_term: "صحة".to_string(),
                translation: "Health".to_string(),
                description: "Perfect health with no disease".to_string(),
            },
            who_icd10: Icd10Entry {
                chapter: "Z".to_string(),
                block: "Z00-Z13".to_string(),
                code: "Z00.0".to_string(),
                word: "Encounter for general adult medical examination".to_string(),
            },
            who_icd11: Icd11Entry {
                entity_id: "MG48".to_string(),
                code: "MG48".to_string(),
                term: "Healthy Person".to_string(),
                description: "No disease detected".to_string(),
            },
        }
    }

    pub fn mild_osteoarthritis() -> Self {
        Self {
            sr_no: 2,
            name_english: "Mild Osteoarthritis".to_string(),
            severity: "Mild".to_string(),
            institutional_entry: InstitutionalEntry {
                code: 517,
                name_devnagari: "सौम्य संधिगत वात".to_string(),
                name_term: "Saum Sandhigata Vata".to_string(),
                description: "Early degenerative joint disease with minimal cartilage loss and slight joint space narrowing. Patient may experience mild discomfort during activity.".to_string(),
            },
            ayurveda: AyurvedaClassification {
                term: "Saum Sandhigata Vata".to_string(),
                description: "Early Vata aggravation in joints with minimal structural changes. Characterized by slight stiffness and occasional pain.".to_string(),
            },
            siddha: SiddhaClassification {
                code: "S6M".to_string(),
                term: "Kuzhaindha Azhal Keel Vayu".to_string(),
                word: "குழைந்த அழல் கீழ் வாயு".to_string(),
                translation: "Mild Osteoarthritis".to_string(),
            },
            unani: UnaniClassification {
                code: "U6M".to_string(),
                word: "Waja-ul-Mafasil Khafeef".to_string(),
                arabic_term: "وجع المفاصل خفيف".to_string(),
                translation: "Mild Joint Pain".to_string(),
                description: "Mild pain affecting the joints with minimal swelling.".to_string(),
            },
            who_icd10: Icd10Entry {
                chapter: "XIII".to_string(),
                block: "M15-M19".to_string(),
                code: "M17.11".to_string(),
                word: "Primary osteoarthritis, right knee - Mild".to_string(),
            },
            who_icd11: Icd11Entry {
                entity_id: "FA01.1".to_string(),
                code: "FA01.1".to_string(),
                term: "Osteoarthritis of knee, mild".to_string(),
                description: "Mild degenerative disorder of the knee joint.".to_string(),
            },
        }
    }

    pub fn moderate_osteoarthritis() -> Self {
        Self {
            sr_no: 3,
            name_english: "Moderate Osteoarthritis".to_string(),
            severity: "Moderate".to_string(),
            institutional_entry: InstitutionalEntry {
                code: 517,
                name_devnagari: "मध्यम संधिगत वात".to_string(),
                name_term: "Madhyam Sandhigata Vata".to_string(),
                description: "Moderate degenerative joint disease with significant cartilage loss and visible joint space narrowing. Patient experiences regular pain and reduced mobility.".to_string(),
            },
            ayurveda: AyurvedaClassification {
                term: "Madhyam Sandhigata Vata".to_string(),
                description: "Moderate Vata aggravation with noticeable structural changes. Pain, swelling, and stiffness are present.".to_string(),
            },
            siddha: SiddhaClassification {
                code: "S6MOD".to_string(),
                term: "Vettiya Azhal Keel Vayu".to_string(),
                word: "வெட்டிய அழல் கீழ் வாயு".to_string(),
                translation: "Moderate Osteoarthritis".to_string(),
            },
            unani: UnaniClassification {
                code: "U6MOD".to_string(),
                word: "Waja-ul-Mafasil Mutawassit".to_string(),
                arabic_term: "وجع المفاصل متوسط".to_string(),
                translation: "Moderate Joint Pain".to_string(),
                description: "Moderate pain affecting the joints with visible swelling.".to_string(),
            },
            who_icd10: Icd10Entry {
                chapter: "XIII".to_string(),
                block: "M15-M19".to_string(),
                code: "M17.12".to_string(),
                word: "Primary osteoarthritis, right knee - Moderate".to_string(),
            },
            who_icd11: Icd11Entry {
                entity_id: "FA01.2".to_string(),
                code: "FA01.2".to_string(),
                term: "Osteoarthritis of knee, moderate".to_string(),
                description: "Moderate degenerative disorder of the knee joint with significant changes.".to_string(),
            },
        }
    }

    pub fn severe_osteoarthritis() -> Self {
        Self {
            sr_no: 4,
            name_english: "Severe Osteoarthritis".to_string(),
            severity: "Severe".to_string(),
            institutional_entry: InstitutionalEntry {
                code: 517,
                name_devnagari: "गंभीर संधिगत वात".to_string(),
                name_term: "Gambhir Sandhigata Vata".to_string(),
                description: "Severe degenerative joint disease with extensive cartilage loss, bone-on-bone contact, and significant joint space loss. Patient experiences severe pain, significant mobility loss, and may require surgical intervention.".to_string(),
            },
            ayurveda: AyurvedaClassification {
                term: "Gambhir Sandhigata Vata".to_string(),
                description: "Severe Vata aggravation with extensive structural damage. Marked pain, swelling, deformity, and severe functional impairment.".to_string(),
            },
            siddha: SiddhaClassification {
                code: "S6S".to_string(),
                term: "Seviya Azhal Keel Vayu".to_string(),
                word: "சேவிய அழல் கீழ் வாயு".to_string(),
                translation: "Severe Osteoarthritis".to_string(),
            },
            unani: UnaniClassification {
                code: "U6S".to_string(),
                word: "Waja-ul-Mafasil Shadeed".to_string(),
                arabic_term: "وجع المفاصل شديد".to_string(),
                translation: "Severe Joint Pain".to_string(),
                description: "Severe pain affecting the joints with significant swelling and functional impairment.".to_string(),
            },
            who_icd10: Icd10Entry {
                chapter: "XIII".to_string(),
                block: "M15-M19".to_string(),
                code: "M17.13".to_string(),
                word: "Primary osteoarthritis, right knee - Severe".to_string(),
            },
            who_icd11: Icd11Entry {
                entity_id: "FA01.3".to_string(),
                code: "FA01.3".to_string(),
                term: "Osteoarthritis of knee, severe".to_string(),
                description: "Severe degenerative disorder of the knee joint with extensive structural changes.".to_string(),
            },
        }
    }

    pub fn tuberculosis() -> Self {
        Self {
            sr_no: 5,
            name_english: "Tuberculosis".to_string(),
            severity: "Active".to_string(),
            institutional_entry: InstitutionalEntry {
                code: 513,
                name_devnagari: "राजयक्ष्मा".to_string(),
                name_term: "Rajayakshma".to_string(),
                description: "A chronic infectious disease leading to tissue wasting and respiratory failure.".to_string(),
            },
            ayurveda: AyurvedaClassification {
                term: "Rajayakshma".to_string(),
                description: "Depletion of Dhatus leading to Kasa (cough) and Jvara (fever).".to_string(),
            },
            siddha: SiddhaClassification {
                code: "S2".to_string(),
                term: "Kshaya Rogam".to_string(),
                word: "க்ஷய ரோகம்".to_string(),
                translation: "Wasting Disease".to_string(),
            },
            unani: UnaniClassification {
                code: "U2".to_string(),
                word: "Sil-o-Diq".to_string(),
                arabic_term: "سل و دق".to_string(),
                translation: "Phthisis".to_string(),
                description: "Chronic lung disease with tissue wasting".to_string(),
            },
            who_icd10: Icd10Entry {
                chapter: "I".to_string(),
                block: "A15-A19".to_string(),
                code: "A15.0".to_string(),
                word: "Tuberculosis of lung".to_string(),
            },
            who_icd11: Icd11Entry {
                entity_id: "135359752".to_string(),
                code: "1B10.Z".to_string(),
                term: "Tuberculosis of the respiratory system, unspecified".to_string(),
                description: "An infectious disease caused by the Mycobacterium tuberculosis complex".to_string(),
            },
        }
    }

    pub fn brain_tumor() -> Self {
        Self {
            sr_no: 6,
            name_english: "Brain Tumor".to_string(),
            severity: "Malignant".to_string(),
            institutional_entry: InstitutionalEntry {
                code: 518,
                name_devnagari: "मस्तिष्क ट्यूमर".to_string(),
                name_term: "Mastishka Granthi".to_string(),
                description: "An abnormal growth of cells in the brain, detectable through MRI imaging.".to_string(),
            },
            ayurveda: AyurvedaClassification {
                term: "Mastishka Granthi".to_string(),
                description: "Morbid growth in the brain region due to Kapha and Medovaha Srotas obstruction.".to_string(),
            },
            siddha: SiddhaClassification {
                code: "S7".to_string(),
                term: "Uyir Natpu".to_string(),
                word: "உயிர் நட்பு".to_string(),
                translation: "Brain Malignancy".to_string(),
            },
            unani: UnaniClassification {
                code: "U7".to_string(),
                word: "Sarataan-e-Dimagh".to_string(),
                arabic_term: "سرطان الدماغ".to_string(),
                translation: "Brain Cancer".to_string(),
                description: "Malignant growth in brain tissue".to_string(),
            },
            who_icd10: Icd10Entry {
                chapter: "II".to_string(),
                block: "C00-D49".to_string(),
                code: "C71.9".to_string(),
                word: "Brain, unspecified".to_string(),
            },
            who_icd11: Icd11Entry {
                entity_id: "8A60.Z".to_string(),
                code: "8A60.Z".to_string(),
                term: "Malignant neoplasm of brain".to_string(),
                description: "Cancerous growth in brain".to_string(),
            },
        }
    }
}
