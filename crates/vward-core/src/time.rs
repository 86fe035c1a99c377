use crate::error::{CoreError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

/// FHIR instant/dateTime carried on the wire as an RFC3339 string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FhirDateTime(pub OffsetDateTime);

impl FhirDateTime {
    pub fn new(datetime: OffsetDateTime) -> Self {
        Self(datetime)
    }
}

impl fmt::Display for FhirDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self
            .0
            .format(&time::format_description::well_known::Rfc3339)
            .map_err(|_| fmt::Error)?;
        write!(f, "{formatted}")
    }
}

impl FromStr for FhirDateTime {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let datetime = OffsetDateTime::parse(s, &time::format_description::well_known::Rfc3339)
            .map_err(|e| {
                CoreError::invalid_date_time(format!("Failed to parse FHIR DateTime '{s}': {e}"))
            })?;
        Ok(FhirDateTime(datetime))
    }
}

impl Serialize for FhirDateTime {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = self
            .0
            .format(&time::format_description::well_known::Rfc3339)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }
}

impl<'de> Deserialize<'de> for FhirDateTime {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FhirDateTime::from_str(&s).map_err(serde::de::Error::custom)
    }
}

pub fn now_utc() -> FhirDateTime {
    FhirDateTime(OffsetDateTime::now_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_fhir_datetime_display() {
        let dt = datetime!(2023-05-15 14:30:00 UTC);
        let fhir_dt = FhirDateTime::new(dt);
        assert_eq!(fhir_dt.to_string(), "2023-05-15T14:30:00Z");
    }

    #[test]
    fn test_fhir_datetime_from_str() {
        let fhir_dt = FhirDateTime::from_str("2023-05-15T14:30:00Z").unwrap();
        assert_eq!(fhir_dt.0, datetime!(2023-05-15 14:30:00 UTC));
    }

    #[test]
    fn test_fhir_datetime_from_str_with_offset() {
        let fhir_dt = FhirDateTime::from_str("2023-05-15T14:30:00+02:00").unwrap();
        let expected_utc = datetime!(2023-05-15 12:30:00 UTC);
        assert_eq!(fhir_dt.0.to_offset(time::UtcOffset::UTC), expected_utc);
    }

    #[test]
    fn test_fhir_datetime_from_str_invalid() {
        assert!(FhirDateTime::from_str("invalid-date").is_err());
        assert!(FhirDateTime::from_str("2023-13-01T00:00:00Z").is_err());
        assert!(FhirDateTime::from_str("").is_err());
    }

    #[test]
    fn test_fhir_datetime_serialization() {
        let fhir_dt = FhirDateTime::new(datetime!(2023-05-15 14:30:00 UTC));
        let json = serde_json::to_string(&fhir_dt).unwrap();
        assert_eq!(json, "\"2023-05-15T14:30:00Z\"");
    }

    #[test]
    fn test_fhir_datetime_deserialization() {
        let fhir_dt: FhirDateTime = serde_json::from_str("\"2023-05-15T14:30:00Z\"").unwrap();
        assert_eq!(fhir_dt.0, datetime!(2023-05-15 14:30:00 UTC));
    }

    #[test]
    fn test_fhir_datetime_ordering() {
        let dt1 = FhirDateTime::new(datetime!(2023-05-15 14:30:00 UTC));
        let dt2 = FhirDateTime::new(datetime!(2023-05-15 14:30:01 UTC));
        assert!(dt1 < dt2);
    }

    #[test]
    fn test_now_utc() {
        let now1 = now_utc();
        let now2 = now_utc();
        assert!(now2 >= now1);
    }

    #[test]
    fn test_error_message_content() {
        match FhirDateTime::from_str("bad-date") {
            Err(CoreError::InvalidDateTime(msg)) => {
                assert!(msg.contains("bad-date"));
            }
            _ => panic!("Expected InvalidDateTime error"),
        }
    }
}
