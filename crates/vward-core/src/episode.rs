//! The EpisodeOfCare resource: one span of virtual ward care.

use crate::bundle;
use crate::coding::{self, systems};
use crate::error::{CoreError, Result};
use crate::time::FhirDateTime;
use crate::types::{CodeableConcept, Identifier, Period, Reference};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EpisodeStatus {
    Planned,
    Active,
    Finished,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeStatusHistory {
    pub status: EpisodeStatus,
    pub period: Period,
}

fn episode_resource_type() -> String {
    "EpisodeOfCare".to_string()
}

/// One admission span on the virtual ward.
///
/// Created locally with a placeholder id at admission; read back from the
/// store with a persisted id at discharge. Status transitions are expressed
/// by submitting a fresh copy with the new status, never by mutating a
/// persisted record in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareEpisode {
    #[serde(rename = "resourceType", default = "episode_resource_type")]
    pub resource_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub identifier: Vec<Identifier>,
    pub status: EpisodeStatus,
    #[serde(
        rename = "statusHistory",
        skip_serializing_if = "Vec::is_empty",
        default
    )]
    pub status_history: Vec<EpisodeStatusHistory>,
    #[serde(rename = "type", skip_serializing_if = "Vec::is_empty", default)]
    pub episode_type: Vec<CodeableConcept>,
    pub patient: Reference,
    #[serde(
        rename = "managingOrganization",
        skip_serializing_if = "Option::is_none"
    )]
    pub managing_organization: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
}

impl CareEpisode {
    /// A freshly admitted, still-unpersisted episode.
    ///
    /// The generated id doubles as the business identifier so the episode
    /// keeps its identity across the fresh copies submitted later.
    pub fn new_active(
        id: String,
        patient: Reference,
        managing_organization: Reference,
        start: FhirDateTime,
    ) -> Self {
        Self {
            resource_type: episode_resource_type(),
            identifier: vec![Identifier::new(systems::VIRTUAL_WARD_IDENTIFIER, &id)],
            id: Some(id),
            status: EpisodeStatus::Active,
            status_history: vec![EpisodeStatusHistory {
                status: EpisodeStatus::Active,
                period: Period::starting_at(start.clone()),
            }],
            episode_type: vec![coding::episode_type()],
            patient,
            managing_organization: Some(managing_organization),
            period: Some(Period::starting_at(start)),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, EpisodeStatus::Active)
    }

    /// A finished copy of this episode, suitable for submission alongside the
    /// discharge encounter. The open active history entry is closed and a
    /// finished entry appended, so the history stays an ordered log.
    pub fn finish(&self, end: FhirDateTime) -> Result<Self> {
        let mut finished = self.clone();

        if let Some(period) = &mut finished.period {
            if let Some(start) = &period.start
                && *start > end
            {
                return Err(CoreError::invalid_period(format!(
                    "episode end {end} precedes start {start}"
                )));
            }
            period.end = Some(end.clone());
        } else {
            finished.period = Some(Period {
                start: None,
                end: Some(end.clone()),
            });
        }

        if let Some(open) = finished
            .status_history
            .iter_mut()
            .rev()
            .find(|h| matches!(h.status, EpisodeStatus::Active) && h.period.end.is_none())
        {
            open.period.end = Some(end.clone());
        }
        finished.status_history.push(EpisodeStatusHistory {
            status: EpisodeStatus::Finished,
            period: Period::starting_at(end),
        });

        finished.status = EpisodeStatus::Finished;
        Ok(finished)
    }

    /// The placeholder URL for this not-yet-persisted episode.
    pub fn placeholder(&self) -> Result<String> {
        let id = self
            .id
            .as_deref()
            .ok_or_else(|| CoreError::missing_field("EpisodeOfCare", "id"))?;
        Ok(bundle::placeholder_for(id))
    }
}
