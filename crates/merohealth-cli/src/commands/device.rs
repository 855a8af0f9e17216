//! Device push-token registration command.

use clap::Subcommand;
use merohealth_core::api::devices::DeviceRegistration;
use merohealth_core::Config;

#[derive(Subcommand)]
pub enum DeviceAction {
    /// Register this device's push token with the backend
    Register {
        /// Push token issued by the platform push service
        token: String,
        /// Platform identifier
        #[arg(long, default_value = "linux")]
        platform: String,
        /// Human-readable device name
        #[arg(long, default_value = "desktop")]
        name: String,
        /// Device type reported to the backend
        #[arg(long, default_value = "desktop")]
        device_type: String,
    },
}

pub async fn run(action: DeviceAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let client = super::client(&config)?;

    match action {
        DeviceAction::Register {
            token,
            platform,
            name,
            device_type,
        } => {
            client
                .register_device(&DeviceRegistration {
                    device_token: token,
                    device_platform: platform,
                    device_name: name,
                    device_type,
                })
                .await?;
            println!("device registered");
        }
    }
    Ok(())
}
