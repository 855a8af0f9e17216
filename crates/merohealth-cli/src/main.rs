use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "merohealth", version, about = "MeroHealth medication reminder CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Account authentication
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Medication management
    Medication {
        #[command(subcommand)]
        action: commands::medication::MedicationAction,
    },
    /// Medication schedule management
    Schedule {
        #[command(subcommand)]
        action: commands::schedule::ScheduleAction,
    },
    /// Reminder listing, responses, and the watch loop
    Reminder {
        #[command(subcommand)]
        action: commands::reminder::ReminderAction,
    },
    /// Caregiver links
    Caregiver {
        #[command(subcommand)]
        action: commands::caregiver::CaregiverAction,
    },
    /// Device push-token registration
    Device {
        #[command(subcommand)]
        action: commands::device::DeviceAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Auth { action } => commands::auth::run(action).await,
        Commands::Medication { action } => commands::medication::run(action).await,
        Commands::Schedule { action } => commands::schedule::run(action).await,
        Commands::Reminder { action } => commands::reminder::run(action).await,
        Commands::Caregiver { action } => commands::caregiver::run(action).await,
        Commands::Device { action } => commands::device::run(action).await,
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
