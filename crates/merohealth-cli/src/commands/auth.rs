//! Account authentication commands.

use clap::Subcommand;
use merohealth_core::api::client::{NewUser, UserType};
use merohealth_core::Config;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Log in and store tokens in the OS keyring
    Login {
        /// Account email
        email: String,
        /// Account password
        password: String,
    },
    /// Register a new account
    Register {
        /// Account email
        email: String,
        /// Account password
        password: String,
        /// Full name
        #[arg(long)]
        name: String,
        /// Age in years
        #[arg(long)]
        age: u32,
        /// Gender
        #[arg(long, default_value = "UNSPECIFIED")]
        gender: String,
        /// Account type: PATIENT or CAREGIVER
        #[arg(long, default_value = "PATIENT")]
        user_type: UserType,
    },
    /// Drop stored credentials
    Logout,
    /// Check authentication status
    Status,
}

pub async fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let client = super::client(&config)?;

    match action {
        AuthAction::Login { email, password } => {
            client.login(&email, &password).await?;
            println!("logged in as {email}");
        }
        AuthAction::Register {
            email,
            password,
            name,
            age,
            gender,
            user_type,
        } => {
            client
                .register(&NewUser {
                    email: email.clone(),
                    password,
                    name,
                    age,
                    gender,
                    user_type,
                })
                .await?;
            println!("registered {email}; log in with `merohealth auth login`");
        }
        AuthAction::Logout => {
            client.logout()?;
            println!("logged out");
        }
        AuthAction::Status => {
            println!(
                "{}",
                if client.is_logged_in()? {
                    "authenticated"
                } else {
                    "not authenticated"
                }
            );
        }
    }
    Ok(())
}
