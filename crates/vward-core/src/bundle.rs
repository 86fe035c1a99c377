//! Transaction bundles and placeholder identifiers.
//!
//! Records created in one atomic submission reference each other through
//! locally generated `urn:uuid:` placeholders until the store assigns real
//! ids. A bundle is only sound when every placeholder reference points at an
//! entry defined at an earlier or equal position.

use crate::error::{CoreError, Result};
use crate::fhir::ResourceType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

pub const PLACEHOLDER_PREFIX: &str = "urn:uuid:";

/// Generate a fresh local resource id.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// The placeholder URL for a locally generated id.
pub fn placeholder_for(id: &str) -> String {
    format!("{PLACEHOLDER_PREFIX}{id}")
}

pub fn is_placeholder(reference: &str) -> bool {
    reference.starts_with(PLACEHOLDER_PREFIX)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleRequest {
    pub method: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(rename = "lastModified", skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BundleEntry {
    #[serde(rename = "fullUrl", skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<BundleRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<BundleResponse>,
}

impl BundleEntry {
    /// An entry directing the store to create a resource of the given kind.
    pub fn create(resource_type: &ResourceType, full_url: String, resource: Value) -> Self {
        Self {
            full_url: Some(full_url),
            resource: Some(resource),
            request: Some(BundleRequest {
                method: "POST".to_string(),
                url: resource_type.to_string(),
            }),
            response: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    #[serde(rename = "resourceType")]
    pub resource_type: String,
    #[serde(rename = "type")]
    pub bundle_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub entry: Vec<BundleEntry>,
}

impl Bundle {
    pub fn transaction(entries: Vec<BundleEntry>) -> Self {
        Self {
            resource_type: "Bundle".to_string(),
            bundle_type: "transaction".to_string(),
            total: None,
            entry: entries,
        }
    }

    pub fn is_transaction_response(&self) -> bool {
        self.bundle_type == "transaction-response"
    }
}

/// Check that every placeholder reference inside the entries targets a
/// placeholder defined at an earlier or equal position, never a later one.
pub fn validate_reference_order(entries: &[BundleEntry]) -> Result<()> {
    let mut defined: HashSet<&str> = HashSet::new();
    for (index, entry) in entries.iter().enumerate() {
        if let Some(url) = entry.full_url.as_deref() {
            defined.insert(url);
        }
        if let Some(resource) = &entry.resource {
            let mut references = Vec::new();
            collect_placeholder_references(resource, &mut references);
            for reference in references {
                if !defined.contains(reference) {
                    return Err(CoreError::unsound_bundle(index, reference));
                }
            }
        }
    }
    Ok(())
}

fn collect_placeholder_references<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::Object(map) => {
            for (key, v) in map {
                if key == "reference"
                    && let Some(s) = v.as_str()
                    && is_placeholder(s)
                {
                    out.push(s);
                }
                collect_placeholder_references(v, out);
            }
        }
        Value::Array(items) => {
            for v in items {
                collect_placeholder_references(v, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(full_url: &str, resource: Value) -> BundleEntry {
        BundleEntry::create(
            &ResourceType::EpisodeOfCare,
            full_url.to_string(),
            resource,
        )
    }

    #[test]
    fn test_placeholder_helpers() {
        let id = generate_id();
        let url = placeholder_for(&id);
        assert!(url.starts_with("urn:uuid:"));
        assert!(is_placeholder(&url));
        assert!(!is_placeholder("EpisodeOfCare/123"));
    }

    #[test]
    fn test_transaction_bundle_wire_shape() {
        let bundle = Bundle::transaction(vec![entry(
            "urn:uuid:a",
            json!({"resourceType": "EpisodeOfCare"}),
        )]);
        let j = serde_json::to_value(&bundle).unwrap();
        assert_eq!(j["resourceType"], "Bundle");
        assert_eq!(j["type"], "transaction");
        assert_eq!(j["entry"][0]["fullUrl"], "urn:uuid:a");
        assert_eq!(j["entry"][0]["request"]["method"], "POST");
        assert_eq!(j["entry"][0]["request"]["url"], "EpisodeOfCare");
    }

    #[test]
    fn test_reference_to_earlier_entry_accepted() {
        let entries = vec![
            entry("urn:uuid:a", json!({"resourceType": "EpisodeOfCare"})),
            entry(
                "urn:uuid:b",
                json!({
                    "resourceType": "Encounter",
                    "episodeOfCare": [{"reference": "urn:uuid:a"}]
                }),
            ),
        ];
        assert!(validate_reference_order(&entries).is_ok());
    }

    #[test]
    fn test_self_reference_accepted() {
        let entries = vec![entry(
            "urn:uuid:a",
            json!({"resourceType": "Encounter", "partOf": {"reference": "urn:uuid:a"}}),
        )];
        assert!(validate_reference_order(&entries).is_ok());
    }

    #[test]
    fn test_reference_to_later_entry_rejected() {
        let entries = vec![
            entry(
                "urn:uuid:b",
                json!({
                    "resourceType": "Encounter",
                    "episodeOfCare": [{"reference": "urn:uuid:a"}]
                }),
            ),
            entry("urn:uuid:a", json!({"resourceType": "EpisodeOfCare"})),
        ];
        match validate_reference_order(&entries) {
            Err(CoreError::UnsoundBundle { entry, reference }) => {
                assert_eq!(entry, 0);
                assert_eq!(reference, "urn:uuid:a");
            }
            other => panic!("expected UnsoundBundle, got {other:?}"),
        }
    }

    #[test]
    fn test_persisted_references_ignored() {
        let entries = vec![entry(
            "urn:uuid:b",
            json!({
                "resourceType": "Encounter",
                "episodeOfCare": [{"reference": "EpisodeOfCare/E1"}]
            }),
        )];
        assert!(validate_reference_order(&entries).is_ok());
    }

    #[test]
    fn test_nested_placeholder_found() {
        let entries = vec![entry(
            "urn:uuid:x",
            json!({
                "resourceType": "Observation",
                "performer": [{"reference": "urn:uuid:missing"}]
            }),
        )];
        assert!(validate_reference_order(&entries).is_err());
    }

    #[test]
    fn test_transaction_response_parsing() {
        let j = json!({
            "resourceType": "Bundle",
            "type": "transaction-response",
            "entry": [{
                "response": {
                    "status": "201 Created",
                    "location": "EpisodeOfCare/E1/_history/1"
                }
            }]
        });
        let bundle: Bundle = serde_json::from_value(j).unwrap();
        assert!(bundle.is_transaction_response());
        let response = bundle.entry[0].response.as_ref().unwrap();
        assert_eq!(response.status, "201 Created");
        assert_eq!(
            response.location.as_deref(),
            Some("EpisodeOfCare/E1/_history/1")
        );
    }
}
