use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Resource types the virtual ward workflow touches
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    Patient,
    Practitioner,
    Organization,
    CareTeam,
    EpisodeOfCare,
    Encounter,
    Observation,
    Bundle,
    OperationOutcome,
    #[serde(untagged)]
    Custom(String),
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceType::Patient => write!(f, "Patient"),
            ResourceType::Practitioner => write!(f, "Practitioner"),
            ResourceType::Organization => write!(f, "Organization"),
            ResourceType::CareTeam => write!(f, "CareTeam"),
            ResourceType::EpisodeOfCare => write!(f, "EpisodeOfCare"),
            ResourceType::Encounter => write!(f, "Encounter"),
            ResourceType::Observation => write!(f, "Observation"),
            ResourceType::Bundle => write!(f, "Bundle"),
            ResourceType::OperationOutcome => write!(f, "OperationOutcome"),
            ResourceType::Custom(name) => write!(f, "{name}"),
        }
    }
}

impl FromStr for ResourceType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Patient" => Ok(ResourceType::Patient),
            "Practitioner" => Ok(ResourceType::Practitioner),
            "Organization" => Ok(ResourceType::Organization),
            "CareTeam" => Ok(ResourceType::CareTeam),
            "EpisodeOfCare" => Ok(ResourceType::EpisodeOfCare),
            "Encounter" => Ok(ResourceType::Encounter),
            "Observation" => Ok(ResourceType::Observation),
            "Bundle" => Ok(ResourceType::Bundle),
            "OperationOutcome" => Ok(ResourceType::OperationOutcome),
            other => {
                // Resource type names are always UpperCamelCase in FHIR
                if other.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
                    Ok(ResourceType::Custom(other.to_string()))
                } else {
                    Err(CoreError::invalid_resource_type(other))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_roundtrip() {
        for name in ["EpisodeOfCare", "Encounter", "Observation", "CareTeam"] {
            let rt = ResourceType::from_str(name).unwrap();
            assert_eq!(rt.to_string(), name);
        }
    }

    #[test]
    fn test_custom_resource_type() {
        let rt = ResourceType::from_str("Appointment").unwrap();
        assert_eq!(rt, ResourceType::Custom("Appointment".to_string()));
        assert_eq!(rt.to_string(), "Appointment");
    }

    #[test]
    fn test_invalid_resource_type() {
        assert!(ResourceType::from_str("observation").is_err());
        assert!(ResourceType::from_str("").is_err());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&ResourceType::EpisodeOfCare).unwrap();
        assert_eq!(json, "\"EpisodeOfCare\"");
        let rt: ResourceType = serde_json::from_str("\"Encounter\"").unwrap();
        assert_eq!(rt, ResourceType::Encounter);
    }
}
