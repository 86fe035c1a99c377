//! The Observation resource: a single recorded measurement or score.

use crate::coding::{BloodPressureComponent, ObservationKind};
use crate::time::FhirDateTime;
use crate::types::{CodeableConcept, Quantity, Reference};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObservationStatus {
    Preliminary,
    Final,
    Amended,
    EnteredInError,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationComponent {
    pub code: CodeableConcept,
    #[serde(rename = "valueQuantity", skip_serializing_if = "Option::is_none")]
    pub value_quantity: Option<Quantity>,
}

fn observation_resource_type() -> String {
    "Observation".to_string()
}

/// A write-once clinical measurement.
///
/// Single-valued kinds carry `valueQuantity`; composite kinds (blood
/// pressure) carry named components instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalObservation {
    #[serde(rename = "resourceType", default = "observation_resource_type")]
    pub resource_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub status: ObservationStatus,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub category: Vec<CodeableConcept>,
    pub code: CodeableConcept,
    pub subject: Reference,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub performer: Vec<Reference>,
    #[serde(rename = "effectiveDateTime")]
    pub effective: FhirDateTime,
    #[serde(rename = "valueQuantity", skip_serializing_if = "Option::is_none")]
    pub value_quantity: Option<Quantity>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub component: Vec<ObservationComponent>,
}

impl VitalObservation {
    fn base(
        id: String,
        kind: ObservationKind,
        subject: Reference,
        performer: Vec<Reference>,
        effective: FhirDateTime,
    ) -> Self {
        Self {
            resource_type: observation_resource_type(),
            id: Some(id),
            status: ObservationStatus::Final,
            category: vec![kind.category()],
            code: kind.code(),
            subject,
            performer,
            effective,
            value_quantity: None,
            component: Vec::new(),
        }
    }

    /// Composite NEWS2 early-warning score.
    pub fn news2_score(
        id: String,
        subject: Reference,
        performer: Vec<Reference>,
        score: f64,
        effective: FhirDateTime,
    ) -> Self {
        let kind = ObservationKind::News2Score;
        let mut obs = Self::base(id, kind, subject, performer, effective);
        obs.value_quantity = kind.unit().map(|u| Quantity::new(score, u));
        obs
    }

    pub fn heart_rate(
        id: String,
        subject: Reference,
        performer: Vec<Reference>,
        bpm: f64,
        effective: FhirDateTime,
    ) -> Self {
        let kind = ObservationKind::HeartRate;
        let mut obs = Self::base(id, kind, subject, performer, effective);
        obs.value_quantity = kind.unit().map(|u| Quantity::new(bpm, u).with_code(u));
        obs
    }

    pub fn blood_pressure(
        id: String,
        subject: Reference,
        performer: Vec<Reference>,
        systolic: f64,
        diastolic: f64,
        effective: FhirDateTime,
    ) -> Self {
        let mut obs = Self::base(
            id,
            ObservationKind::BloodPressure,
            subject,
            performer,
            effective,
        );
        obs.component = vec![
            bp_component(BloodPressureComponent::Systolic, systolic),
            bp_component(BloodPressureComponent::Diastolic, diastolic),
        ];
        obs
    }

    /// True when the subject recorded this measurement themselves.
    pub fn is_self_reported(&self) -> bool {
        self.performer.len() == 1 && self.performer[0] == self.subject
    }
}

fn bp_component(slot: BloodPressureComponent, value: f64) -> ObservationComponent {
    ObservationComponent {
        code: slot.code(),
        value_quantity: Some(Quantity::new(value, slot.unit())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coding::systems;
    use crate::time::now_utc;
    use crate::types::{Identifier, PatientRef};

    fn performers() -> Vec<Reference> {
        vec![
            Reference::logical(Identifier::new(systems::GMC_NUMBER, "456")),
            Reference::logical(Identifier::new(systems::ODS_ORGANIZATION, "RX7")),
        ]
    }

    #[test]
    fn test_news2_score_value() {
        let obs = VitalObservation::news2_score(
            "o-1".to_string(),
            PatientRef::id("789").to_reference(),
            performers(),
            4.0,
            now_utc(),
        );
        assert!(obs.code.has_code(systems::SNOMED, "1104051000000101"));
        assert_eq!(obs.value_quantity.as_ref().unwrap().value, 4.0);
        assert!(obs.component.is_empty());
        assert!(!obs.is_self_reported());
    }

    #[test]
    fn test_heart_rate_wire_shape() {
        let obs = VitalObservation::heart_rate(
            "o-2".to_string(),
            PatientRef::id("789").to_reference(),
            performers(),
            72.0,
            now_utc(),
        );
        let j = serde_json::to_value(&obs).unwrap();
        assert_eq!(j["resourceType"], "Observation");
        assert_eq!(j["status"], "final");
        assert_eq!(j["category"][0]["coding"][0]["code"], "vital-signs");
        assert_eq!(j["valueQuantity"]["value"], 72.0);
        assert_eq!(j["valueQuantity"]["unit"], "/min");
        assert!(j["effectiveDateTime"].is_string());
    }

    #[test]
    fn test_blood_pressure_components() {
        let obs = VitalObservation::blood_pressure(
            "o-3".to_string(),
            PatientRef::id("789").to_reference(),
            performers(),
            120.0,
            80.0,
            now_utc(),
        );
        assert!(obs.value_quantity.is_none());
        assert_eq!(obs.component.len(), 2);
        assert!(obs.component[0].code.has_code(systems::LOINC, "8480-6"));
        assert_eq!(obs.component[0].value_quantity.as_ref().unwrap().value, 120.0);
        assert!(obs.component[1].code.has_code(systems::LOINC, "8462-4"));
        assert_eq!(obs.component[1].value_quantity.as_ref().unwrap().value, 80.0);
    }

    #[test]
    fn test_self_reported_performer() {
        let subject = PatientRef::nhs_number("9234234599").to_reference();
        let obs = VitalObservation::heart_rate(
            "o-4".to_string(),
            subject.clone(),
            vec![subject],
            68.0,
            now_utc(),
        );
        assert!(obs.is_self_reported());
    }
}
