use thiserror::Error;

/// Core error types for virtual ward resource construction
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid FHIR resource type: {0}")]
    InvalidResourceType(String),

    #[error("Invalid FHIR DateTime: {0}")]
    InvalidDateTime(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    #[error("Missing field on {resource}: {field}")]
    MissingField { resource: String, field: String },

    #[error("Unsound bundle: entry {entry} references {reference} before it is defined")]
    UnsoundBundle { entry: usize, reference: String },

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CoreError {
    /// Create a new InvalidResourceType error
    pub fn invalid_resource_type(resource_type: impl Into<String>) -> Self {
        Self::InvalidResourceType(resource_type.into())
    }

    /// Create a new InvalidDateTime error
    pub fn invalid_date_time(datetime: impl Into<String>) -> Self {
        Self::InvalidDateTime(datetime.into())
    }

    /// Create a new InvalidReference error
    pub fn invalid_reference(reference: impl Into<String>) -> Self {
        Self::InvalidReference(reference.into())
    }

    /// Create a new InvalidPeriod error
    pub fn invalid_period(message: impl Into<String>) -> Self {
        Self::InvalidPeriod(message.into())
    }

    /// Create a new MissingField error
    pub fn missing_field(resource: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            resource: resource.into(),
            field: field.into(),
        }
    }

    /// Create a new UnsoundBundle error
    pub fn unsound_bundle(entry: usize, reference: impl Into<String>) -> Self {
        Self::UnsoundBundle {
            entry,
            reference: reference.into(),
        }
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = CoreError::invalid_resource_type("InvalidType");
        assert_eq!(err.to_string(), "Invalid FHIR resource type: InvalidType");
    }

    #[test]
    fn test_missing_field_error() {
        let err = CoreError::missing_field("EpisodeOfCare", "id");
        assert_eq!(err.to_string(), "Missing field on EpisodeOfCare: id");
    }

    #[test]
    fn test_unsound_bundle_error() {
        let err = CoreError::unsound_bundle(0, "urn:uuid:abc");
        assert_eq!(
            err.to_string(),
            "Unsound bundle: entry 0 references urn:uuid:abc before it is defined"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err: serde_json::Error =
            serde_json::from_str::<serde_json::Value>("{ invalid json }").unwrap_err();
        let core_err: CoreError = json_err.into();
        assert!(matches!(core_err, CoreError::JsonError(_)));
    }
}
