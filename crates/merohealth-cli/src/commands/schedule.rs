//! Medication schedule commands.

use clap::Subcommand;
use merohealth_core::api::medications::{Frequency, ScheduleUpdate, Timing};
use merohealth_core::Config;

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Show the schedule of a medication
    Get {
        /// Medication ID
        medication_id: i64,
    },
    /// Update dosage, frequency, timing, or time of day
    Set {
        /// Medication ID
        medication_id: i64,
        /// Dosage description (e.g. "250mg", "1 tablet")
        #[arg(long)]
        dosage: Option<String>,
        /// Frequency: DAILY, WEEKLY, MONTHLY, or AS_NEEDED
        #[arg(long)]
        frequency: Option<Frequency>,
        /// Timing: BEFORE_MEAL, AFTER_MEAL, WITH_MEAL, or ANY_TIME
        #[arg(long)]
        timing: Option<Timing>,
        /// Time of day, HH:MM:SS
        #[arg(long)]
        time: Option<String>,
    },
    /// List a linked patient's schedules (caregiver accounts)
    Patient {
        /// Patient user ID
        patient_id: i64,
    },
}

pub async fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let client = super::client(&config)?;

    match action {
        ScheduleAction::Get { medication_id } => {
            let schedule = client.get_schedule(medication_id).await?;
            println!("{}", serde_json::to_string_pretty(&schedule)?);
        }
        ScheduleAction::Set {
            medication_id,
            dosage,
            frequency,
            timing,
            time,
        } => {
            let update = ScheduleUpdate {
                dosage,
                frequency,
                timing,
                time,
            };
            let schedule = client.update_schedule(medication_id, &update).await?;
            println!("{}", serde_json::to_string_pretty(&schedule)?);
        }
        ScheduleAction::Patient { patient_id } => {
            let schedules = client.patient_schedules(patient_id).await?;
            println!("{}", serde_json::to_string_pretty(&schedules)?);
        }
    }
    Ok(())
}
