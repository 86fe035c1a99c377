//! Vital-sign recording.

use crate::client::FhirClient;
use crate::config::WardSettings;
use crate::error::Result;
use crate::submit::TransactionSubmitter;
use tracing::info;
use vward_core::{PatientRef, Recorder, VitalSigns, build_observation_set, now_utc};

/// Records ward-round observation sets as single atomic bundles.
///
/// Observations have no state machine; each is a write-once fact. A failed
/// submission leaves none of the three measurements recorded.
pub struct ObservationRecordingService {
    submitter: TransactionSubmitter,
    settings: WardSettings,
}

impl ObservationRecordingService {
    pub fn new(client: FhirClient, settings: WardSettings) -> Self {
        Self {
            submitter: TransactionSubmitter::new(client),
            settings,
        }
    }

    /// Record a NEWS2 score for a patient, with the remaining vitals of the
    /// round left unmeasured.
    pub async fn record(&self, patient_id: &str, news2_score: f64) -> Result<()> {
        self.record_vitals(&PatientRef::id(patient_id), &VitalSigns::score_only(news2_score))
            .await
    }

    /// Record a full set of vitals taken by the configured clinician.
    pub async fn record_vitals(&self, patient: &PatientRef, vitals: &VitalSigns) -> Result<()> {
        self.submit_set(patient, &self.settings.recorder(), vitals)
            .await
    }

    /// Record a set of vitals the patient reported themselves.
    pub async fn record_self_reported(
        &self,
        patient: &PatientRef,
        vitals: &VitalSigns,
    ) -> Result<()> {
        self.submit_set(patient, &Recorder::SelfReported, vitals)
            .await
    }

    async fn submit_set(
        &self,
        patient: &PatientRef,
        recorder: &Recorder,
        vitals: &VitalSigns,
    ) -> Result<()> {
        let set = build_observation_set(patient, recorder, vitals, now_utc());
        let count = set.observations.len();
        self.submitter.submit(set.into_entries()?).await?;
        info!(observations = count, "recorded ward round observations");
        Ok(())
    }
}
