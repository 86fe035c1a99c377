//! Clinical coding tables for the virtual ward workflow.
//!
//! Every coded concept the resource builders emit lives here, keyed by the
//! kind of record being built, so construction code never carries inline
//! SNOMED/LOINC literals.

use crate::types::{CodeableConcept, Coding, Extension};

/// Identifier and terminology system URIs.
pub mod systems {
    pub const SNOMED: &str = "http://snomed.info/sct";
    pub const LOINC: &str = "http://loinc.org";

    pub const NHS_NUMBER: &str = "https://fhir.nhs.uk/Id/nhs-number";
    pub const ODS_ORGANIZATION: &str = "https://fhir.nhs.uk/Id/ods-organization-code";
    pub const GMC_NUMBER: &str = "https://fhir.hl7.org.uk/Id/gmc-number";
    pub const GMP_NUMBER: &str = "https://fhir.hl7.org.uk/Id/gmp-number";
    pub const VIRTUAL_WARD_IDENTIFIER: &str = "http://example.org/virtualward-identifier";

    pub const OBSERVATION_CATEGORY: &str =
        "http://terminology.hl7.org/CodeSystem/observation-category";
    pub const EPISODE_OF_CARE_TYPE: &str =
        "http://terminology.hl7.org/CodeSystem/episodeofcare-type";
    pub const V3_ACT_CODE: &str = "http://terminology.hl7.org/CodeSystem/v3-ActCode";
    pub const V3_PARTICIPATION_TYPE: &str =
        "http://terminology.hl7.org/CodeSystem/v3-ParticipationType";

    pub const UKCORE_ADMISSION_METHOD: &str =
        "https://fhir.hl7.org.uk/CodeSystem/UKCore-AdmissionMethodEngland";
    pub const UKCORE_DISCHARGE_METHOD: &str =
        "https://fhir.hl7.org.uk/CodeSystem/UKCore-DischargeMethodEngland";
    pub const UKCORE_ADMIT_SOURCE: &str =
        "https://fhir.hl7.org.uk/CodeSystem/UKCore-SourceOfAdmissionEngland";
    pub const EXT_ADMISSION_METHOD: &str =
        "https://fhir.hl7.org.uk/StructureDefinition/Extension-UKCore-AdmissionMethod";
    pub const EXT_DISCHARGE_METHOD: &str =
        "https://fhir.hl7.org.uk/StructureDefinition/Extension-UKCore-DischargeMethod";
}

/// The kinds of observation a ward round records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObservationKind {
    News2Score,
    HeartRate,
    BloodPressure,
}

impl ObservationKind {
    pub fn code(&self) -> CodeableConcept {
        match self {
            Self::News2Score => CodeableConcept::single(
                Coding::new(systems::SNOMED, "1104051000000101").with_display(
                    "Royal College of Physicians NEWS2 (National Early Warning Score 2) total score",
                ),
            ),
            Self::HeartRate => CodeableConcept::of(vec![
                Coding::new(systems::SNOMED, "364075005").with_display("Heart Rate"),
                Coding::new(systems::LOINC, "8867-4").with_display("Heart Rate"),
            ]),
            Self::BloodPressure => CodeableConcept::of(vec![
                Coding::new(systems::SNOMED, "75367002").with_display("Blood pressure"),
                Coding::new(systems::LOINC, "55284-4").with_display("Blood pressure"),
            ]),
        }
    }

    pub fn category(&self) -> CodeableConcept {
        match self {
            Self::News2Score => CodeableConcept::single(
                Coding::new(systems::OBSERVATION_CATEGORY, "survey").with_display("Survey"),
            ),
            Self::HeartRate | Self::BloodPressure => CodeableConcept::single(
                Coding::new(systems::OBSERVATION_CATEGORY, "vital-signs")
                    .with_display("Vital Signs"),
            ),
        }
    }

    /// Unit for single-valued kinds; composite kinds carry units per component.
    pub fn unit(&self) -> Option<&'static str> {
        match self {
            Self::News2Score => Some("ScoreOf"),
            Self::HeartRate => Some("/min"),
            Self::BloodPressure => None,
        }
    }
}

/// Component slots of a composite blood pressure observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BloodPressureComponent {
    Systolic,
    Diastolic,
}

impl BloodPressureComponent {
    pub fn code(&self) -> CodeableConcept {
        match self {
            Self::Systolic => CodeableConcept::of(vec![
                Coding::new(systems::SNOMED, "271650006").with_display("Systolic blood pressure"),
                Coding::new(systems::LOINC, "8480-6").with_display("Systolic blood pressure"),
            ]),
            Self::Diastolic => CodeableConcept::of(vec![
                Coding::new(systems::SNOMED, "271651007").with_display("Diastolic blood pressure"),
                Coding::new(systems::LOINC, "8462-4").with_display("Diastolic blood pressure"),
            ]),
        }
    }

    pub fn unit(&self) -> &'static str {
        "mmHg"
    }
}

/// EpisodeOfCare.type for a virtual ward stay.
pub fn episode_type() -> CodeableConcept {
    CodeableConcept::single(
        Coding::new(systems::EPISODE_OF_CARE_TYPE, "hacc")
            .with_display("Home and Community Care"),
    )
    .with_text("Virtual Wards")
}

/// Encounter.class for a remote consultation.
pub fn encounter_class() -> Coding {
    Coding::new(systems::V3_ACT_CODE, "VR").with_display("Virtual")
}

/// Participant type for the attending clinician.
pub fn attender_role() -> CodeableConcept {
    CodeableConcept::single(
        Coding::new(systems::V3_PARTICIPATION_TYPE, "ATND").with_display("attender"),
    )
    .with_text("Attender")
}

/// Hospitalization.admitSource: source of admission not otherwise specified.
pub fn admit_source() -> CodeableConcept {
    CodeableConcept::single(Coding::new(systems::UKCORE_ADMIT_SOURCE, "99"))
}

pub fn admission_method_extension() -> Extension {
    Extension::coded(
        systems::EXT_ADMISSION_METHOD,
        CodeableConcept::single(Coding::new(systems::UKCORE_ADMISSION_METHOD, "99")),
    )
}

pub fn discharge_method_extension() -> Extension {
    Extension::coded(
        systems::EXT_DISCHARGE_METHOD,
        CodeableConcept::single(Coding::new(systems::UKCORE_DISCHARGE_METHOD, "99")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news2_coding() {
        let code = ObservationKind::News2Score.code();
        assert!(code.has_code(systems::SNOMED, "1104051000000101"));
        assert_eq!(ObservationKind::News2Score.unit(), Some("ScoreOf"));
    }

    #[test]
    fn test_heart_rate_carries_both_systems() {
        let code = ObservationKind::HeartRate.code();
        assert!(code.has_code(systems::SNOMED, "364075005"));
        assert!(code.has_code(systems::LOINC, "8867-4"));
    }

    #[test]
    fn test_blood_pressure_components() {
        assert!(
            BloodPressureComponent::Systolic
                .code()
                .has_code(systems::LOINC, "8480-6")
        );
        assert!(
            BloodPressureComponent::Diastolic
                .code()
                .has_code(systems::SNOMED, "271651007")
        );
        assert_eq!(BloodPressureComponent::Systolic.unit(), "mmHg");
    }

    #[test]
    fn test_score_categorized_as_survey() {
        assert!(
            ObservationKind::News2Score
                .category()
                .has_code(systems::OBSERVATION_CATEGORY, "survey")
        );
        assert!(
            ObservationKind::HeartRate
                .category()
                .has_code(systems::OBSERVATION_CATEGORY, "vital-signs")
        );
    }

    #[test]
    fn test_episode_and_encounter_concepts() {
        assert!(episode_type().has_code(systems::EPISODE_OF_CARE_TYPE, "hacc"));
        assert_eq!(encounter_class().code.as_deref(), Some("VR"));
        assert!(attender_role().has_code(systems::V3_PARTICIPATION_TYPE, "ATND"));
    }
}
