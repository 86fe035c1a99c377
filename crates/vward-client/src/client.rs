//! HTTP transport against the FHIR store.

use crate::error::{Result, WardError};
use serde_json::Value;
use std::time::Duration;
use vward_core::{Bundle, ResourceType};

const FHIR_JSON: &str = "application/fhir+json";

/// Thin client over the store's REST endpoint.
///
/// Every call is bounded by the configured timeout; an expired timeout
/// surfaces as `WardError::Transport`.
#[derive(Debug, Clone)]
pub struct FhirClient {
    http: reqwest::Client,
    base_url: String,
}

impl FhirClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    fn fhir_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// POST a transaction bundle to the store root and return the response
    /// bundle.
    pub async fn transaction(&self, bundle: &Bundle) -> Result<Bundle> {
        let response = self
            .http
            .post(format!("{}/", self.base_url))
            .header("Content-Type", FHIR_JSON)
            .header("Accept", FHIR_JSON)
            .json(bundle)
            .send()
            .await?;
        let value = handle_response(response).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Search for resources of one type, returning the searchset bundle.
    pub async fn search(
        &self,
        resource_type: &ResourceType,
        params: &[(&str, String)],
    ) -> Result<Bundle> {
        let response = self
            .http
            .get(self.fhir_url(&resource_type.to_string()))
            .query(params)
            .header("Accept", FHIR_JSON)
            .send()
            .await?;
        let value = handle_response(response).await?;
        Ok(serde_json::from_value(value)?)
    }
}

async fn handle_response(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        // Surface OperationOutcome diagnostics when the store provides them
        if let Ok(json) = serde_json::from_str::<Value>(&body)
            && json.get("resourceType").and_then(|v| v.as_str()) == Some("OperationOutcome")
            && let Some(issues) = json.get("issue").and_then(|v| v.as_array())
        {
            let msgs: Vec<&str> = issues
                .iter()
                .filter_map(|i| i.get("diagnostics").and_then(|d| d.as_str()))
                .collect();
            if !msgs.is_empty() {
                return Err(WardError::unexpected(format!(
                    "HTTP {status}: {}",
                    msgs.join("; ")
                )));
            }
        }
        return Err(WardError::unexpected(format!("HTTP {status}: {body}")));
    }

    if body.is_empty() {
        return Err(WardError::unexpected("empty response body"));
    }

    Ok(serde_json::from_str(&body)?)
}
