//! Admission and discharge orchestration.
//!
//! The per-patient state machine is NoActiveEpisode -> Active -> Finished.
//! Both transitions are single atomic submissions; the search-then-write
//! sequence on discharge is not atomic against the store, so concurrent
//! lifecycle calls for the same patient need external serialization.

use crate::client::FhirClient;
use crate::config::WardSettings;
use crate::error::{Result, WardError};
use crate::submit::TransactionSubmitter;
use tracing::{debug, info};
use vward_core::coding::systems;
use vward_core::{
    CareEpisode, PatientRef, ResourceType, build_admission, build_discharge, now_utc,
};

pub struct EpisodeLifecycleService {
    client: FhirClient,
    submitter: TransactionSubmitter,
    settings: WardSettings,
}

impl EpisodeLifecycleService {
    pub fn new(client: FhirClient, settings: WardSettings) -> Self {
        Self {
            submitter: TransactionSubmitter::new(client.clone()),
            client,
            settings,
        }
    }

    /// Admit a patient to the virtual ward.
    ///
    /// Guards against a second concurrent stay: if the store already holds an
    /// active episode for this patient the call fails without writing. On
    /// success, returns the persisted episode id.
    pub async fn admit(&self, nhs_number: &str) -> Result<String> {
        if let Some(existing) = self.find_active_episode(nhs_number).await? {
            return Err(WardError::AlreadyAdmitted {
                nhs_number: nhs_number.to_string(),
                episode_id: existing.id.unwrap_or_default(),
            });
        }

        let patient = PatientRef::nhs_number(nhs_number);
        let graph = build_admission(&patient, &self.settings.identity(), now_utc());
        let episode_placeholder = graph.episode_placeholder()?;

        let receipt = self.submitter.submit(graph.into_entries()?).await?;
        let episode = receipt.persisted_id(&episode_placeholder).ok_or_else(|| {
            WardError::unexpected("store response carries no persisted episode id")
        })?;

        info!(episode = %episode, "admitted patient to virtual ward");
        Ok(episode.id.clone())
    }

    /// Discharge a patient from the virtual ward.
    ///
    /// Finds the active episode, then submits the finished episode copy and
    /// the discharge encounter together as one bundle: either both are
    /// durably created or neither is.
    pub async fn discharge(&self, nhs_number: &str) -> Result<()> {
        let active = self
            .find_active_episode(nhs_number)
            .await?
            .ok_or_else(|| WardError::NoActiveEpisode {
                nhs_number: nhs_number.to_string(),
            })?;

        let graph = build_discharge(&active, &self.settings.identity(), now_utc())?;
        self.submitter.submit(graph.into_entries()?).await?;

        info!(
            episode = %active.id.as_deref().unwrap_or("?"),
            "discharged patient from virtual ward"
        );
        Ok(())
    }

    /// Look up the patient's currently active episode, if any.
    ///
    /// More than one active episode violates the one-stay-per-patient
    /// invariant and is surfaced rather than silently picking one.
    pub async fn find_active_episode(&self, nhs_number: &str) -> Result<Option<CareEpisode>> {
        let params = [
            (
                "patient:identifier",
                format!("{}|{nhs_number}", systems::NHS_NUMBER),
            ),
            ("status", "active".to_string()),
        ];
        let bundle = self
            .client
            .search(&ResourceType::EpisodeOfCare, &params)
            .await?;
        debug!(matches = bundle.entry.len(), "active episode search");

        // Searchsets may carry extra entries (e.g. an OperationOutcome with
        // search.mode=outcome); only EpisodeOfCare entries are matches.
        let mut episodes = bundle
            .entry
            .into_iter()
            .filter_map(|e| e.resource)
            .filter(|r| {
                r.get("resourceType").and_then(|v| v.as_str()) == Some("EpisodeOfCare")
            })
            .map(serde_json::from_value::<CareEpisode>)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        match episodes.len() {
            0 => Ok(None),
            1 => Ok(Some(episodes.remove(0))),
            n => Err(WardError::invariant(format!(
                "found {n} active episodes for patient {nhs_number}, expected at most one"
            ))),
        }
    }
}
