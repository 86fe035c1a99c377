//! The Encounter resource: a single admission or discharge visit.

use crate::coding;
use crate::types::{CodeableConcept, Coding, Extension, Identifier, Reference};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EncounterStatus {
    Planned,
    InProgress,
    Finished,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterParticipant {
    #[serde(rename = "type", skip_serializing_if = "Vec::is_empty", default)]
    pub participant_type: Vec<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub individual: Option<Reference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Hospitalization {
    #[serde(rename = "admitSource", skip_serializing_if = "Option::is_none")]
    pub admit_source: Option<CodeableConcept>,
}

fn encounter_resource_type() -> String {
    "Encounter".to_string()
}

/// A completed virtual ward visit.
///
/// Encounters model point-in-time events here, so the status is always
/// `finished` on construction. The episode reference may be a placeholder
/// only while the episode travels in the same pending bundle; otherwise it
/// must carry the persisted id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalEncounter {
    #[serde(rename = "resourceType", default = "encounter_resource_type")]
    pub resource_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub identifier: Vec<Identifier>,
    pub status: EncounterStatus,
    pub class: Coding,
    pub subject: Reference,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub participant: Vec<EncounterParticipant>,
    #[serde(rename = "episodeOfCare", skip_serializing_if = "Vec::is_empty", default)]
    pub episode_of_care: Vec<Reference>,
    #[serde(rename = "serviceProvider", skip_serializing_if = "Option::is_none")]
    pub service_provider: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospitalization: Option<Hospitalization>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub extension: Vec<Extension>,
}

impl ClinicalEncounter {
    pub fn finished(
        id: String,
        subject: Reference,
        episode: Reference,
        attending: Reference,
        service_provider: Reference,
    ) -> Self {
        Self {
            resource_type: encounter_resource_type(),
            identifier: vec![Identifier::new(
                coding::systems::VIRTUAL_WARD_IDENTIFIER,
                &id,
            )],
            id: Some(id),
            status: EncounterStatus::Finished,
            class: coding::encounter_class(),
            subject,
            participant: vec![EncounterParticipant {
                participant_type: vec![coding::attender_role()],
                individual: Some(attending),
            }],
            episode_of_care: vec![episode],
            service_provider: Some(service_provider),
            hospitalization: Some(Hospitalization {
                admit_source: Some(coding::admit_source()),
            }),
            extension: vec![coding::admission_method_extension()],
        }
    }

    /// Mark this as a discharge visit.
    pub fn with_discharge_method(mut self) -> Self {
        self.extension.push(coding::discharge_method_extension());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coding::systems;
    use crate::types::PatientRef;

    fn sample_encounter() -> ClinicalEncounter {
        ClinicalEncounter::finished(
            "enc-1".to_string(),
            PatientRef::nhs_number("9234234599").to_reference(),
            Reference::literal("urn:uuid:e-1"),
            Reference::literal("Practitioner/doc-1")
                .with_identifier(Identifier::new(systems::GMP_NUMBER, "G0109459")),
            Reference::literal("CareTeam/team-1").with_display("Virtual Ward Team"),
        )
    }

    #[test]
    fn test_finished_shape() {
        let enc = sample_encounter();
        assert_eq!(enc.status, EncounterStatus::Finished);
        assert_eq!(enc.class.code.as_deref(), Some("VR"));
        assert_eq!(enc.participant.len(), 1);
        assert!(enc.participant[0].participant_type[0].has_code(
            systems::V3_PARTICIPATION_TYPE,
            "ATND"
        ));
        assert_eq!(
            enc.episode_of_care[0].reference.as_deref(),
            Some("urn:uuid:e-1")
        );
        assert_eq!(enc.extension.len(), 1);
    }

    #[test]
    fn test_serialized_wire_shape() {
        let j = serde_json::to_value(sample_encounter()).unwrap();
        assert_eq!(j["resourceType"], "Encounter");
        assert_eq!(j["status"], "finished");
        assert_eq!(j["class"]["code"], "VR");
        assert_eq!(j["episodeOfCare"][0]["reference"], "urn:uuid:e-1");
        assert_eq!(j["serviceProvider"]["reference"], "CareTeam/team-1");
        assert_eq!(
            j["hospitalization"]["admitSource"]["coding"][0]["code"],
            "99"
        );
        assert_eq!(j["extension"][0]["url"], systems::EXT_ADMISSION_METHOD);
    }

    #[test]
    fn test_discharge_method_appended() {
        let enc = sample_encounter().with_discharge_method();
        assert_eq!(enc.extension.len(), 2);
        assert_eq!(enc.extension[1].url, systems::EXT_DISCHARGE_METHOD);
    }

    #[test]
    fn test_status_wire_form_is_kebab() {
        let s = serde_json::to_string(&EncounterStatus::InProgress).unwrap();
        assert_eq!(s, "\"in-progress\"");
    }
}
