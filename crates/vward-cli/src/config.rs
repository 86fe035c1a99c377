use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use vward_client::{ClinicianSettings, OrganizationSettings, WardSettings, WardTeamSettings};
use vward_core::coding::systems;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct ProfileConfig {
    pub server: Option<String>,
    pub timeout_secs: Option<u64>,
    pub ods_code: Option<String>,
    pub organization_display: Option<String>,
    pub clinician_id: Option<String>,
    pub clinician_system: Option<String>,
    pub clinician_reference: Option<String>,
    pub clinician_display: Option<String>,
    pub ward_team: Option<String>,
    pub ward_team_display: Option<String>,
}

pub type ConfigFile = HashMap<String, ProfileConfig>;

fn config_dir() -> Result<PathBuf> {
    let dir = dirs::home_dir()
        .context("Cannot determine home directory")?
        .join(".vward");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

pub fn load_all() -> Result<ConfigFile> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(ConfigFile::new());
    }
    let content = fs::read_to_string(&path)?;
    let cfg: ConfigFile = toml::from_str(&content)?;
    Ok(cfg)
}

pub fn load_profile(profile: &str) -> Result<ProfileConfig> {
    let all = load_all()?;
    Ok(all
        .into_iter()
        .find(|(k, _)| k == profile)
        .map(|(_, v)| v)
        .unwrap_or_default())
}

pub fn save_profile(profile: &str, config: ProfileConfig) -> Result<()> {
    let mut all = load_all()?;
    all.insert(profile.to_string(), config);
    let content = toml::to_string_pretty(&all)?;
    fs::write(config_path()?, content)?;
    Ok(())
}

pub fn set_key(config: &mut ProfileConfig, key: &str, value: &str) -> Result<()> {
    match key {
        "server" => config.server = Some(value.to_string()),
        "timeout_secs" => {
            config.timeout_secs =
                Some(value.parse().context("timeout_secs must be a number of seconds")?)
        }
        "ods_code" => config.ods_code = Some(value.to_string()),
        "organization_display" => config.organization_display = Some(value.to_string()),
        "clinician_id" => config.clinician_id = Some(value.to_string()),
        "clinician_system" => config.clinician_system = Some(value.to_string()),
        "clinician_reference" => config.clinician_reference = Some(value.to_string()),
        "clinician_display" => config.clinician_display = Some(value.to_string()),
        "ward_team" => config.ward_team = Some(value.to_string()),
        "ward_team_display" => config.ward_team_display = Some(value.to_string()),
        other => anyhow::bail!(
            "Unknown config key: {other}. Valid keys: server, timeout_secs, ods_code, \
             organization_display, clinician_id, clinician_system, clinician_reference, \
             clinician_display, ward_team, ward_team_display"
        ),
    }
    Ok(())
}

pub fn resolve_server(cli_server: &Option<String>, profile: &str) -> Result<String> {
    // 1. --server flag / VWARD_URL env
    if let Some(s) = cli_server {
        return Ok(s.clone());
    }
    // 2. config.toml profile
    let cfg = load_profile(profile)?;
    if let Some(s) = cfg.server {
        return Ok(s);
    }
    anyhow::bail!(
        "No server URL configured. Use --server, set VWARD_URL env var, or run: vward config set server <url>"
    )
}

/// Assemble the ward settings for one operation from the resolved server and
/// the profile's identity fields.
pub fn resolve_settings(cli_server: &Option<String>, profile: &str) -> Result<WardSettings> {
    let base_url = resolve_server(cli_server, profile)?;
    let cfg = load_profile(profile)?;

    let ods_code = cfg.ods_code.context(
        "No organization configured. Run: vward config set ods_code <code>",
    )?;
    let clinician_id = cfg.clinician_id.context(
        "No clinician configured. Run: vward config set clinician_id <registration number>",
    )?;
    let ward_team = cfg.ward_team.context(
        "No ward team configured. Run: vward config set ward_team <CareTeam reference>",
    )?;

    Ok(WardSettings {
        base_url,
        timeout_secs: cfg.timeout_secs.unwrap_or(30),
        organization: OrganizationSettings {
            ods_code,
            display: cfg.organization_display,
        },
        clinician: ClinicianSettings {
            id: clinician_id,
            system: cfg
                .clinician_system
                .unwrap_or_else(|| systems::GMC_NUMBER.to_string()),
            reference: cfg.clinician_reference,
            display: cfg.clinician_display,
        },
        ward_team: WardTeamSettings {
            reference: ward_team,
            display: cfg.ward_team_display,
        },
    })
}
