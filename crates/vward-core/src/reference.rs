//! Parsing of reference and location strings returned by the store.
//!
//! Transaction responses report each created resource as a location string
//! such as `EpisodeOfCare/5/_history/1`, sometimes as an absolute URL. This
//! module resolves those into typed (resource type, id, version) triples.

use crate::error::{CoreError, Result};
use crate::fhir::ResourceType;
use std::fmt;
use std::str::FromStr;

/// A parsed pointer to a persisted resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FhirReference {
    pub resource_type: ResourceType,
    pub id: String,
    /// Version from a `_history` suffix, if the store reported one.
    pub version: Option<String>,
}

impl FhirReference {
    pub fn new(resource_type: ResourceType, id: impl Into<String>) -> Self {
        Self {
            resource_type,
            id: id.into(),
            version: None,
        }
    }

    /// The reference as a relative string (Type/id).
    pub fn to_relative(&self) -> String {
        format!("{}/{}", self.resource_type, self.id)
    }
}

impl fmt::Display for FhirReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_relative())
    }
}

/// Parse a location or reference string into its components.
///
/// Accepts relative references (`Encounter/9`), versioned locations
/// (`Encounter/9/_history/1`) and absolute URLs, from which the trailing
/// `Type/id[/_history/version]` segments are taken. Placeholder (`urn:`) and
/// contained (`#`) references are never resolvable to a persisted resource.
pub fn parse_location(location: &str) -> Result<FhirReference> {
    let location = location.trim();
    if location.is_empty() {
        return Err(CoreError::invalid_reference("empty reference"));
    }
    if location.starts_with('#') || location.starts_with("urn:") {
        return Err(CoreError::invalid_reference(format!(
            "not a persisted resource location: {location}"
        )));
    }

    let path = match location.find("://") {
        Some(idx) => location[idx + 3..]
            .split_once('/')
            .map(|(_, rest)| rest)
            .unwrap_or(""),
        None => location,
    };

    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    // The `Type/id` pair sits immediately before `_history` when the location
    // is versioned, otherwise at the tail. Service prefixes in absolute URLs
    // (e.g. /fhir/R4/Encounter/9) fall away on either path.
    let (type_idx, version) = match parts.iter().rposition(|p| *p == "_history") {
        Some(h) => {
            if h < 2 {
                return Err(CoreError::invalid_reference(format!(
                    "malformed versioned location: {location}"
                )));
            }
            (h - 2, parts.get(h + 1).map(|v| (*v).to_string()))
        }
        None => {
            if parts.len() < 2 {
                return Err(CoreError::invalid_reference(format!(
                    "location has no resource id: {location}"
                )));
            }
            (parts.len() - 2, None)
        }
    };

    Ok(FhirReference {
        resource_type: ResourceType::from_str(parts[type_idx])?,
        id: parts[type_idx + 1].to_string(),
        version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_relative_location() {
        let r = parse_location("EpisodeOfCare/123").unwrap();
        assert_eq!(r.resource_type, ResourceType::EpisodeOfCare);
        assert_eq!(r.id, "123");
        assert_eq!(r.version, None);
    }

    #[test]
    fn test_versioned_location() {
        let r = parse_location("Encounter/9/_history/2").unwrap();
        assert_eq!(r.resource_type, ResourceType::Encounter);
        assert_eq!(r.id, "9");
        assert_eq!(r.version, Some("2".to_string()));
    }

    #[test]
    fn test_absolute_location() {
        let r = parse_location("http://store.example.org/fhir/R4/Observation/42/_history/1")
            .unwrap();
        assert_eq!(r.resource_type, ResourceType::Observation);
        assert_eq!(r.id, "42");
        assert_eq!(r.version, Some("1".to_string()));
    }

    #[test]
    fn test_uppercase_id_not_mistaken_for_type() {
        let r = parse_location("EpisodeOfCare/E1/_history/1").unwrap();
        assert_eq!(r.resource_type, ResourceType::EpisodeOfCare);
        assert_eq!(r.id, "E1");
        assert_eq!(r.version, Some("1".to_string()));
    }

    #[test]
    fn test_urn_rejected() {
        assert!(parse_location("urn:uuid:550e8400-e29b-41d4-a716-446655440000").is_err());
    }

    #[test]
    fn test_contained_rejected() {
        assert!(parse_location("#contained-id").is_err());
    }

    #[test]
    fn test_missing_id_rejected() {
        assert!(parse_location("EpisodeOfCare/").is_err());
        assert!(parse_location("EpisodeOfCare").is_err());
    }

    #[test]
    fn test_empty_rejected() {
        assert!(parse_location("").is_err());
        assert!(parse_location("   ").is_err());
    }

    #[test]
    fn test_to_relative() {
        let r = FhirReference::new(ResourceType::EpisodeOfCare, "E1");
        assert_eq!(r.to_relative(), "EpisodeOfCare/E1");
        assert_eq!(format!("{r}"), "EpisodeOfCare/E1");
    }
}
