//! Externally supplied ward configuration.
//!
//! Organization, clinician and ward team identities arrive here rather than
//! living as constants in construction code; the same settings drive every
//! operation against one store.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use vward_core::coding::systems;
use vward_core::{Identifier, Recorder, Reference, WardIdentity};

fn default_timeout_secs() -> u64 {
    30
}

fn default_clinician_system() -> String {
    systems::GMC_NUMBER.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationSettings {
    /// ODS organization code, e.g. "RX7".
    pub ods_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicianSettings {
    /// Professional registration number, e.g. a GMC number.
    pub id: String,
    #[serde(default = "default_clinician_system")]
    pub system: String,
    /// Literal Practitioner reference when the clinician is a store resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WardTeamSettings {
    /// Literal CareTeam reference, e.g. "CareTeam/1add538f-...".
    pub reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WardSettings {
    /// Base URL of the FHIR store.
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    pub organization: OrganizationSettings,
    pub clinician: ClinicianSettings,
    pub ward_team: WardTeamSettings,
}

impl WardSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn organization_reference(&self) -> Reference {
        let mut r = Reference::logical(Identifier::new(
            systems::ODS_ORGANIZATION,
            &self.organization.ods_code,
        ));
        if let Some(display) = &self.organization.display {
            r = r.with_display(display);
        }
        r
    }

    fn clinician_reference(&self) -> Reference {
        let identifier = Identifier::new(&self.clinician.system, &self.clinician.id);
        let mut r = match &self.clinician.reference {
            Some(literal) => Reference::literal(literal).with_identifier(identifier),
            None => Reference::logical(identifier),
        };
        if let Some(display) = &self.clinician.display {
            r = r.with_display(display);
        }
        r
    }

    fn ward_team_reference(&self) -> Reference {
        let mut r = Reference::literal(&self.ward_team.reference);
        if let Some(display) = &self.ward_team.display {
            r = r.with_display(display);
        }
        r
    }

    /// The actor references stamped onto episode and encounter records.
    pub fn identity(&self) -> WardIdentity {
        WardIdentity {
            managing_organization: self.organization_reference(),
            attending_clinician: self.clinician_reference(),
            ward_team: self.ward_team_reference(),
        }
    }

    /// The performer pair stamped onto clinician-recorded observations.
    pub fn recorder(&self) -> Recorder {
        Recorder::Clinician {
            practitioner: self.clinician_reference(),
            organization: self.organization_reference(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_settings(base_url: &str) -> WardSettings {
        WardSettings {
            base_url: base_url.to_string(),
            timeout_secs: 5,
            organization: OrganizationSettings {
                ods_code: "RX7".to_string(),
                display: Some("North West Ambulance Trust".to_string()),
            },
            clinician: ClinicianSettings {
                id: "456".to_string(),
                system: systems::GMC_NUMBER.to_string(),
                reference: None,
                display: None,
            },
            ward_team: WardTeamSettings {
                reference: "CareTeam/team-1".to_string(),
                display: Some("Virtual Ward Team".to_string()),
            },
        }
    }

    #[test]
    fn test_identity_references() {
        let identity = sample_settings("http://localhost").identity();
        assert_eq!(
            identity
                .managing_organization
                .identifier
                .as_ref()
                .unwrap()
                .value
                .as_deref(),
            Some("RX7")
        );
        assert_eq!(
            identity.ward_team.reference.as_deref(),
            Some("CareTeam/team-1")
        );
        assert!(identity.attending_clinician.reference.is_none());
    }

    #[test]
    fn test_clinician_with_literal_reference() {
        let mut settings = sample_settings("http://localhost");
        settings.clinician.reference = Some("Practitioner/doc-1".to_string());
        let identity = settings.identity();
        assert_eq!(
            identity.attending_clinician.reference.as_deref(),
            Some("Practitioner/doc-1")
        );
        assert!(identity.attending_clinician.identifier.is_some());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let toml_like = serde_json::json!({
            "base_url": "http://localhost:8080/fhir",
            "organization": {"ods_code": "RX7"},
            "clinician": {"id": "456"},
            "ward_team": {"reference": "CareTeam/team-1"}
        });
        let settings: WardSettings = serde_json::from_value(toml_like).unwrap();
        assert_eq!(settings.timeout_secs, 30);
        assert_eq!(settings.clinician.system, systems::GMC_NUMBER);
    }
}
