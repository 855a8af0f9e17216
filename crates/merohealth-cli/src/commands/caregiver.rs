//! Caregiver link commands.

use clap::Subcommand;
use merohealth_core::api::caregivers::{NewCaregiverLink, PermissionLevel, Relationship};
use merohealth_core::Config;

#[derive(Subcommand)]
pub enum CaregiverAction {
    /// List linked caregivers
    List,
    /// Link a caregiver by email
    Link {
        /// Caregiver account email
        email: String,
        /// Relationship: FAMILY, DOCTOR, NURSE, CARETAKER, or OTHER
        #[arg(long, default_value = "FAMILY")]
        relationship: Relationship,
        /// Permission level: VIEW, MANAGE, or FULL
        #[arg(long, default_value = "VIEW")]
        permission: PermissionLevel,
        /// Mark as an emergency contact
        #[arg(long)]
        emergency: bool,
    },
}

pub async fn run(action: CaregiverAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let client = super::client(&config)?;

    match action {
        CaregiverAction::List => {
            let caregivers = client.list_caregivers().await?;
            println!("{}", serde_json::to_string_pretty(&caregivers)?);
        }
        CaregiverAction::Link {
            email,
            relationship,
            permission,
            emergency,
        } => {
            let link = client
                .link_caregiver(&NewCaregiverLink {
                    caregiver_email: email,
                    relationship,
                    permission_level: permission,
                    emergency_contact: emergency,
                })
                .await?;
            println!("Caregiver linked: {}", link.id);
            println!("{}", serde_json::to_string_pretty(&link)?);
        }
    }
    Ok(())
}
