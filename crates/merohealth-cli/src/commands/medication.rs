//! Medication management commands.

use clap::Subcommand;
use merohealth_core::api::medications::NewMedication;
use merohealth_core::Config;

#[derive(Subcommand)]
pub enum MedicationAction {
    /// List medications
    List,
    /// Get medication details
    Get {
        /// Medication ID
        id: i64,
    },
    /// Add a medication
    Add {
        /// Medication name
        name: String,
        /// Usage instructions
        #[arg(long)]
        instructions: Option<String>,
    },
    /// Update a medication
    Update {
        /// Medication ID
        id: i64,
        /// New name
        #[arg(long)]
        name: String,
        /// New instructions
        #[arg(long)]
        instructions: Option<String>,
    },
    /// Delete a medication
    Delete {
        /// Medication ID
        id: i64,
    },
}

pub async fn run(action: MedicationAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let client = super::client(&config)?;

    match action {
        MedicationAction::List => {
            let medications = client.list_medications().await?;
            println!("{}", serde_json::to_string_pretty(&medications)?);
        }
        MedicationAction::Get { id } => {
            let medication = client.get_medication(id).await?;
            println!("{}", serde_json::to_string_pretty(&medication)?);
        }
        MedicationAction::Add { name, instructions } => {
            let medication = client
                .create_medication(&NewMedication { name, instructions })
                .await?;
            println!("Medication created: {}", medication.id);
            println!("{}", serde_json::to_string_pretty(&medication)?);
        }
        MedicationAction::Update {
            id,
            name,
            instructions,
        } => {
            let medication = client
                .update_medication(id, &NewMedication { name, instructions })
                .await?;
            println!("{}", serde_json::to_string_pretty(&medication)?);
        }
        MedicationAction::Delete { id } => {
            client.delete_medication(id).await?;
            println!("Medication deleted: {id}");
        }
    }
    Ok(())
}
