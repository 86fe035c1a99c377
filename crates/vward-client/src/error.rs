use crate::submit::EntryOutcome;
use thiserror::Error;
use vward_core::CoreError;

/// Failures surfaced by the ward services.
///
/// None of these are retried internally; retry policy, if any, wraps the
/// services from outside.
#[derive(Debug, Error)]
pub enum WardError {
    /// The remote call could not complete (network, TLS, timeout).
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store rejected or partially rejected the transaction. The store's
    /// transaction semantics mean none of the entries should be trusted as
    /// created.
    #[error(
        "transaction rejected by the store: {} of {} entries failed",
        .outcomes.iter().filter(|o| !o.is_created()).count(),
        .outcomes.len()
    )]
    Submission { outcomes: Vec<EntryOutcome> },

    /// Discharge requested for a patient with no active episode.
    #[error("no active episode found for patient {nhs_number}")]
    NoActiveEpisode { nhs_number: String },

    /// Admission requested while an episode is already active.
    #[error("patient {nhs_number} already has active episode {episode_id}")]
    AlreadyAdmitted {
        nhs_number: String,
        episode_id: String,
    },

    /// A domain invariant does not hold in the store's data.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// The store answered, but not with anything this client understands.
    #[error("unexpected response from the store: {0}")]
    UnexpectedResponse(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("failed to decode response: {0}")]
    Json(#[from] serde_json::Error),
}

impl WardError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::UnexpectedResponse(message.into())
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, WardError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use vward_core::ResourceType;

    #[test]
    fn test_submission_error_counts_failures() {
        let outcomes = vec![
            EntryOutcome {
                full_url: "urn:uuid:a".to_string(),
                expected_type: ResourceType::from_str("EpisodeOfCare").unwrap(),
                status: "201 Created".to_string(),
                location: Some("EpisodeOfCare/1/_history/1".to_string()),
            },
            EntryOutcome {
                full_url: "urn:uuid:b".to_string(),
                expected_type: ResourceType::from_str("Encounter").unwrap(),
                status: "400 Bad Request".to_string(),
                location: None,
            },
        ];
        let err = WardError::Submission { outcomes };
        assert_eq!(
            err.to_string(),
            "transaction rejected by the store: 1 of 2 entries failed"
        );
    }

    #[test]
    fn test_no_active_episode_message() {
        let err = WardError::NoActiveEpisode {
            nhs_number: "9234234599".to_string(),
        };
        assert!(err.to_string().contains("9234234599"));
    }

    #[test]
    fn test_core_error_is_transparent() {
        let err: WardError = CoreError::missing_field("EpisodeOfCare", "id").into();
        assert_eq!(err.to_string(), "Missing field on EpisodeOfCare: id");
    }
}
