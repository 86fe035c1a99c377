//! Atomic transaction submission and response interpretation.

use crate::client::FhirClient;
use crate::error::{Result, WardError};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{debug, warn};
use vward_core::{Bundle, BundleEntry, FhirReference, ResourceType, parse_location};

/// Per-entry outcome reported by the store.
#[derive(Debug, Clone)]
pub struct EntryOutcome {
    /// The placeholder the entry travelled under.
    pub full_url: String,
    /// The resource kind the entry asked the store to create.
    pub expected_type: ResourceType,
    /// Raw HTTP status line from the response entry.
    pub status: String,
    /// Raw location string, when the store reported one.
    pub location: Option<String>,
}

impl EntryOutcome {
    pub fn is_created(&self) -> bool {
        self.status.starts_with("201")
    }

    /// The persisted reference, present only when the entry was created and
    /// its location names the expected resource kind.
    pub fn persisted(&self) -> Option<FhirReference> {
        if !self.is_created() {
            return None;
        }
        let location = self.location.as_deref()?;
        let reference = parse_location(location).ok()?;
        (reference.resource_type == self.expected_type).then_some(reference)
    }
}

/// The placeholder-to-persisted-id mapping of a fully successful submission.
#[derive(Debug, Clone)]
pub struct TransactionReceipt {
    outcomes: Vec<EntryOutcome>,
    by_placeholder: HashMap<String, FhirReference>,
}

impl TransactionReceipt {
    pub fn outcomes(&self) -> &[EntryOutcome] {
        &self.outcomes
    }

    /// The persisted reference assigned to a placeholder.
    pub fn persisted_id(&self, placeholder: &str) -> Option<&FhirReference> {
        self.by_placeholder.get(placeholder)
    }
}

/// Submits record sets as single all-or-nothing transactions.
///
/// Atomicity is the store's guarantee; this type's job is to send exactly one
/// bundle per call and to refuse to report success unless every entry was
/// durably created as the kind that was asked for.
#[derive(Debug, Clone)]
pub struct TransactionSubmitter {
    client: FhirClient,
}

impl TransactionSubmitter {
    pub fn new(client: FhirClient) -> Self {
        Self { client }
    }

    pub async fn submit(&self, entries: Vec<BundleEntry>) -> Result<TransactionReceipt> {
        vward_core::bundle::validate_reference_order(&entries).map_err(WardError::Core)?;

        let expected = expected_outcomes(&entries)?;
        let bundle = Bundle::transaction(entries);
        debug!(entries = bundle.entry.len(), "submitting transaction bundle");

        let response = self.client.transaction(&bundle).await?;
        if !response.is_transaction_response() {
            return Err(WardError::unexpected(format!(
                "expected a transaction-response bundle, got type '{}'",
                response.bundle_type
            )));
        }
        if response.entry.len() != expected.len() {
            return Err(WardError::unexpected(format!(
                "store answered {} entries for a {}-entry transaction",
                response.entry.len(),
                expected.len()
            )));
        }

        let outcomes: Vec<EntryOutcome> = expected
            .into_iter()
            .zip(&response.entry)
            .map(|((full_url, expected_type), entry)| {
                let (status, location) = match &entry.response {
                    Some(r) => (r.status.clone(), r.location.clone()),
                    None => (String::new(), None),
                };
                EntryOutcome {
                    full_url,
                    expected_type,
                    status,
                    location,
                }
            })
            .collect();

        let mut by_placeholder = HashMap::new();
        for outcome in &outcomes {
            match outcome.persisted() {
                Some(reference) => {
                    by_placeholder.insert(outcome.full_url.clone(), reference);
                }
                None => {
                    warn!(
                        full_url = %outcome.full_url,
                        status = %outcome.status,
                        "transaction entry was not created as requested"
                    );
                    return Err(WardError::Submission { outcomes });
                }
            }
        }

        Ok(TransactionReceipt {
            outcomes,
            by_placeholder,
        })
    }
}

fn expected_outcomes(entries: &[BundleEntry]) -> Result<Vec<(String, ResourceType)>> {
    entries
        .iter()
        .map(|entry| {
            let full_url = entry
                .full_url
                .clone()
                .ok_or_else(|| WardError::unexpected("bundle entry without a fullUrl"))?;
            let request = entry
                .request
                .as_ref()
                .ok_or_else(|| WardError::unexpected("bundle entry without a request"))?;
            let resource_type =
                ResourceType::from_str(&request.url).map_err(WardError::Core)?;
            Ok((full_url, resource_type))
        })
        .collect()
}
