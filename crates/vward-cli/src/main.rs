mod cli;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use output::print_error;
use vward_client::{EpisodeLifecycleService, FhirClient, ObservationRecordingService, WardSettings};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let profile = &cli.profile;

    match &cli.command {
        Commands::Admit(args) => {
            let settings = config::resolve_settings(&cli.server, profile)?;
            let service = lifecycle_service(settings)?;
            commands::ward::admit(&service, &args.nhs_number).await?;
        }
        Commands::Discharge(args) => {
            let settings = config::resolve_settings(&cli.server, profile)?;
            let service = lifecycle_service(settings)?;
            commands::ward::discharge(&service, &args.nhs_number).await?;
        }
        Commands::Record(args) => {
            let settings = config::resolve_settings(&cli.server, profile)?;
            let client = FhirClient::new(&settings.base_url, settings.timeout())?;
            let service = ObservationRecordingService::new(client, settings);
            commands::ward::record(&service, args).await?;
        }
        Commands::Status(args) => {
            let settings = config::resolve_settings(&cli.server, profile)?;
            let service = lifecycle_service(settings)?;
            commands::ward::status(&service, &args.nhs_number).await?;
        }
        Commands::Config(args) => match &args.command {
            cli::ConfigCommands::Show => {
                let cfg = config::load_profile(profile)?;
                println!("{}: {}", "Profile".cyan(), profile);
                println!(
                    "{}: {}",
                    "Server".cyan(),
                    cfg.server.as_deref().unwrap_or("(not set)")
                );
                println!(
                    "{}: {}",
                    "Organization".cyan(),
                    cfg.ods_code.as_deref().unwrap_or("(not set)")
                );
                println!(
                    "{}: {}",
                    "Clinician".cyan(),
                    cfg.clinician_id.as_deref().unwrap_or("(not set)")
                );
                println!(
                    "{}: {}",
                    "Ward team".cyan(),
                    cfg.ward_team.as_deref().unwrap_or("(not set)")
                );
            }
            cli::ConfigCommands::Set(set_args) => {
                let mut cfg = config::load_profile(profile)?;
                config::set_key(&mut cfg, &set_args.key, &set_args.value)?;
                config::save_profile(profile, cfg)?;
                output::print_success(&format!("Set {} = {}", set_args.key, set_args.value));
            }
        },
    }

    Ok(())
}

fn lifecycle_service(settings: WardSettings) -> Result<EpisodeLifecycleService> {
    let client = FhirClient::new(&settings.base_url, settings.timeout())?;
    Ok(EpisodeLifecycleService::new(client, settings))
}
