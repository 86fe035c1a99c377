pub mod bundle;
pub mod coding;
pub mod encounter;
pub mod episode;
pub mod error;
pub mod fhir;
pub mod graph;
pub mod observation;
pub mod reference;
pub mod time;
pub mod types;

pub use bundle::{Bundle, BundleEntry, BundleRequest, BundleResponse, placeholder_for};
pub use encounter::{ClinicalEncounter, EncounterParticipant, EncounterStatus};
pub use episode::{CareEpisode, EpisodeStatus, EpisodeStatusHistory};
pub use error::{CoreError, Result};
pub use fhir::ResourceType;
pub use graph::{
    AdmissionGraph, DischargeGraph, ObservationSet, Recorder, VitalSigns, WardIdentity,
    build_admission, build_discharge, build_observation_set,
};
pub use observation::{ObservationStatus, VitalObservation};
pub use reference::{FhirReference, parse_location};
pub use time::{FhirDateTime, now_utc};
pub use types::{
    CodeableConcept, Coding, Extension, Identifier, PatientRef, Period, Quantity, Reference,
};
