pub mod client;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod observations;
pub mod submit;

pub use client::FhirClient;
pub use config::{ClinicianSettings, OrganizationSettings, WardSettings, WardTeamSettings};
pub use error::{Result, WardError};
pub use lifecycle::EpisodeLifecycleService;
pub use observations::ObservationRecordingService;
pub use submit::{EntryOutcome, TransactionReceipt, TransactionSubmitter};
