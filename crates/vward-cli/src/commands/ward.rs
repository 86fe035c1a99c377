use anyhow::Result;
use colored::Colorize;

use crate::cli::RecordArgs;
use crate::output::{print_field, print_success};
use vward_client::{EpisodeLifecycleService, ObservationRecordingService};
use vward_core::{PatientRef, VitalSigns};

pub async fn admit(service: &EpisodeLifecycleService, nhs_number: &str) -> Result<()> {
    let episode_id = service.admit(nhs_number).await?;
    print_success(&format!(
        "Admitted patient {} (episode {})",
        nhs_number.cyan(),
        episode_id.cyan()
    ));
    Ok(())
}

pub async fn discharge(service: &EpisodeLifecycleService, nhs_number: &str) -> Result<()> {
    service.discharge(nhs_number).await?;
    print_success(&format!("Discharged patient {}", nhs_number.cyan()));
    Ok(())
}

pub async fn record(service: &ObservationRecordingService, args: &RecordArgs) -> Result<()> {
    let patient = PatientRef::id(&args.patient_id);
    let vitals = VitalSigns {
        news2_score: args.score,
        heart_rate_bpm: args.heart_rate,
        systolic_mmhg: args.systolic,
        diastolic_mmhg: args.diastolic,
    };
    if args.self_reported {
        service.record_self_reported(&patient, &vitals).await?;
    } else {
        service.record_vitals(&patient, &vitals).await?;
    }
    print_success(&format!(
        "Recorded observations for patient {} (NEWS2 {})",
        args.patient_id.cyan(),
        args.score
    ));
    Ok(())
}

pub async fn status(service: &EpisodeLifecycleService, nhs_number: &str) -> Result<()> {
    match service.find_active_episode(nhs_number).await? {
        Some(episode) => {
            print_field("Patient", nhs_number);
            print_field("Episode", episode.id.as_deref().unwrap_or("?"));
            print_field("Status", "active");
            if let Some(start) = episode.period.as_ref().and_then(|p| p.start.as_ref()) {
                print_field("Admitted", &start.to_string());
            }
        }
        None => {
            println!("Patient {} has no active episode.", nhs_number.cyan());
        }
    }
    Ok(())
}
