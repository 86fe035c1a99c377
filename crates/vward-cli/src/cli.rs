use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vward")]
#[command(about = "Virtual ward CLI — admit, discharge and record observations")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// FHIR store base URL (overrides config and VWARD_URL env var)
    #[arg(short, long, global = true, env = "VWARD_URL")]
    pub server: Option<String>,

    /// Config profile name
    #[arg(short, long, global = true, env = "VWARD_PROFILE", default_value = "default")]
    pub profile: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Admit a patient to the virtual ward
    Admit(AdmitArgs),
    /// Discharge a patient from the virtual ward
    Discharge(DischargeArgs),
    /// Record a set of vital-sign observations
    Record(RecordArgs),
    /// Show a patient's active episode, if any
    Status(StatusArgs),
    /// Manage CLI configuration
    Config(ConfigArgs),
}

#[derive(clap::Args)]
pub struct AdmitArgs {
    /// Patient NHS number (e.g. 9234234599)
    pub nhs_number: String,
}

#[derive(clap::Args)]
pub struct DischargeArgs {
    /// Patient NHS number (e.g. 9234234599)
    pub nhs_number: String,
}

#[derive(clap::Args)]
pub struct RecordArgs {
    /// Patient resource id on the store (e.g. 789)
    pub patient_id: String,
    /// NEWS2 score
    pub score: f64,
    /// Heart rate in beats per minute
    #[arg(long, default_value_t = 0.0)]
    pub heart_rate: f64,
    /// Systolic blood pressure in mmHg
    #[arg(long, default_value_t = 0.0)]
    pub systolic: f64,
    /// Diastolic blood pressure in mmHg
    #[arg(long, default_value_t = 0.0)]
    pub diastolic: f64,
    /// Mark the set as reported by the patient themselves
    #[arg(long)]
    pub self_reported: bool,
}

#[derive(clap::Args)]
pub struct StatusArgs {
    /// Patient NHS number (e.g. 9234234599)
    pub nhs_number: String,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current config
    Show,
    /// Set config value
    Set(ConfigSetArgs),
}

#[derive(clap::Args)]
pub struct ConfigSetArgs {
    /// Key to set (server, ods_code, clinician_id, ward_team, ...)
    pub key: String,
    /// Value
    pub value: String,
}
