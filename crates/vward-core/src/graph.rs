//! Resource graph construction.
//!
//! Pure builders that assemble internally consistent record sets for the
//! three ward operations: admission (episode + encounter sharing one pending
//! bundle), discharge (finished episode copy + encounter referencing the
//! persisted episode), and a vital-sign observation set. No I/O happens here;
//! timestamps are passed in so construction stays deterministic apart from
//! generated ids.

use crate::bundle::{BundleEntry, generate_id, placeholder_for, validate_reference_order};
use crate::encounter::ClinicalEncounter;
use crate::episode::CareEpisode;
use crate::error::{CoreError, Result};
use crate::fhir::ResourceType;
use crate::observation::VitalObservation;
use crate::time::FhirDateTime;
use crate::types::{PatientRef, Reference};

/// The externally configured actors stamped onto every record: who manages
/// the ward, who attends, and which team provides the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WardIdentity {
    pub managing_organization: Reference,
    pub attending_clinician: Reference,
    pub ward_team: Reference,
}

/// Who recorded an observation set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorder {
    /// Recorded by a clinician on behalf of the listed organization.
    Clinician {
        practitioner: Reference,
        organization: Reference,
    },
    /// Reported by the patient themselves.
    SelfReported,
}

impl Recorder {
    fn performers(&self, subject: &Reference) -> Vec<Reference> {
        match self {
            Self::Clinician {
                practitioner,
                organization,
            } => vec![practitioner.clone(), organization.clone()],
            Self::SelfReported => vec![subject.clone()],
        }
    }
}

/// The measurements taken on one ward round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VitalSigns {
    pub news2_score: f64,
    pub heart_rate_bpm: f64,
    pub systolic_mmhg: f64,
    pub diastolic_mmhg: f64,
}

impl VitalSigns {
    /// A round where only the composite score was taken.
    pub fn score_only(news2_score: f64) -> Self {
        Self {
            news2_score,
            heart_rate_bpm: 0.0,
            systolic_mmhg: 0.0,
            diastolic_mmhg: 0.0,
        }
    }
}

/// Episode plus admission encounter, wired through one placeholder.
#[derive(Debug, Clone)]
pub struct AdmissionGraph {
    pub episode: CareEpisode,
    pub encounter: ClinicalEncounter,
}

impl AdmissionGraph {
    /// The placeholder URL under which the episode travels in the bundle.
    pub fn episode_placeholder(&self) -> Result<String> {
        self.episode.placeholder()
    }

    /// Bundle entries in dependency order: episode first, then the encounter
    /// that references it.
    pub fn into_entries(self) -> Result<Vec<BundleEntry>> {
        let episode_url = self.episode.placeholder()?;
        let encounter_url = encounter_placeholder(&self.encounter)?;
        let entries = vec![
            BundleEntry::create(
                &ResourceType::EpisodeOfCare,
                episode_url,
                serde_json::to_value(&self.episode)?,
            ),
            BundleEntry::create(
                &ResourceType::Encounter,
                encounter_url,
                serde_json::to_value(&self.encounter)?,
            ),
        ];
        validate_reference_order(&entries)?;
        Ok(entries)
    }
}

/// Finished episode copy plus discharge encounter, submitted as one unit.
#[derive(Debug, Clone)]
pub struct DischargeGraph {
    pub episode: CareEpisode,
    pub encounter: ClinicalEncounter,
}

impl DischargeGraph {
    pub fn into_entries(self) -> Result<Vec<BundleEntry>> {
        let episode_url = placeholder_for(&generate_id());
        let encounter_url = encounter_placeholder(&self.encounter)?;
        let entries = vec![
            BundleEntry::create(
                &ResourceType::EpisodeOfCare,
                episode_url,
                serde_json::to_value(&self.episode)?,
            ),
            BundleEntry::create(
                &ResourceType::Encounter,
                encounter_url,
                serde_json::to_value(&self.encounter)?,
            ),
        ];
        validate_reference_order(&entries)?;
        Ok(entries)
    }
}

/// The three observations of one ward round, each independently addressable.
#[derive(Debug, Clone)]
pub struct ObservationSet {
    pub observations: Vec<VitalObservation>,
}

impl ObservationSet {
    pub fn into_entries(self) -> Result<Vec<BundleEntry>> {
        let mut entries = Vec::with_capacity(self.observations.len());
        for observation in &self.observations {
            let id = observation
                .id
                .as_deref()
                .ok_or_else(|| CoreError::missing_field("Observation", "id"))?;
            entries.push(BundleEntry::create(
                &ResourceType::Observation,
                placeholder_for(id),
                serde_json::to_value(observation)?,
            ));
        }
        validate_reference_order(&entries)?;
        Ok(entries)
    }
}

/// Build the admission graph: a new active episode and the admission
/// encounter referencing it by placeholder.
pub fn build_admission(
    patient: &PatientRef,
    identity: &WardIdentity,
    now: FhirDateTime,
) -> AdmissionGraph {
    let episode_id = generate_id();
    let episode_reference = Reference::literal(placeholder_for(&episode_id));
    let episode = CareEpisode::new_active(
        episode_id,
        patient.to_reference(),
        identity.managing_organization.clone(),
        now,
    );
    let encounter = ClinicalEncounter::finished(
        generate_id(),
        patient.to_reference(),
        episode_reference,
        identity.attending_clinician.clone(),
        identity.ward_team.clone(),
    );
    AdmissionGraph { episode, encounter }
}

/// Build the discharge graph from an already-persisted active episode.
///
/// The encounter references the episode's persisted id, not a placeholder:
/// the episode has existed in the store since admission, and placeholders are
/// only valid within a single still-pending bundle.
pub fn build_discharge(
    active_episode: &CareEpisode,
    identity: &WardIdentity,
    now: FhirDateTime,
) -> Result<DischargeGraph> {
    let persisted_id = active_episode
        .id
        .as_deref()
        .ok_or_else(|| CoreError::missing_field("EpisodeOfCare", "id"))?;
    let episode_reference = Reference::literal(format!("EpisodeOfCare/{persisted_id}"));

    let finished = active_episode.finish(now)?;
    let encounter = ClinicalEncounter::finished(
        generate_id(),
        active_episode.patient.clone(),
        episode_reference,
        identity.attending_clinician.clone(),
        identity.ward_team.clone(),
    )
    .with_discharge_method();

    Ok(DischargeGraph {
        episode: finished,
        encounter,
    })
}

/// Build the three-observation set for one ward round: NEWS2 score, heart
/// rate, and blood pressure, sharing subject, performers and effective time.
pub fn build_observation_set(
    subject: &PatientRef,
    recorder: &Recorder,
    vitals: &VitalSigns,
    now: FhirDateTime,
) -> ObservationSet {
    let subject_reference = subject.to_reference();
    let performers = recorder.performers(&subject_reference);
    let observations = vec![
        VitalObservation::news2_score(
            generate_id(),
            subject_reference.clone(),
            performers.clone(),
            vitals.news2_score,
            now.clone(),
        ),
        VitalObservation::heart_rate(
            generate_id(),
            subject_reference.clone(),
            performers.clone(),
            vitals.heart_rate_bpm,
            now.clone(),
        ),
        VitalObservation::blood_pressure(
            generate_id(),
            subject_reference,
            performers,
            vitals.systolic_mmhg,
            vitals.diastolic_mmhg,
            now,
        ),
    ];
    ObservationSet { observations }
}

fn encounter_placeholder(encounter: &ClinicalEncounter) -> Result<String> {
    let id = encounter
        .id
        .as_deref()
        .ok_or_else(|| CoreError::missing_field("Encounter", "id"))?;
    Ok(placeholder_for(id))
}
