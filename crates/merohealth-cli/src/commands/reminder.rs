//! Reminder commands: listing, manual take/skip responses, and the
//! foreground watch loop.

use clap::Subcommand;
use merohealth_core::{
    Config, ConsolePresenter, Database, DesktopNotifier, EngineOptions, ReminderEngine,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Subcommand)]
pub enum ReminderAction {
    /// List reminders
    List,
    /// Mark a reminder as taken
    Take {
        /// Reminder ID
        id: i64,
    },
    /// Mark a reminder as skipped
    Skip {
        /// Reminder ID
        id: i64,
    },
    /// Poll for due reminders until interrupted
    Watch {
        /// Skip desktop notifications, console alerts only
        #[arg(long)]
        no_desktop: bool,
        /// Do not prompt for take/skip responses
        #[arg(long)]
        no_prompt: bool,
    },
}

pub async fn run(action: ReminderAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let client = super::client(&config)?;

    match action {
        ReminderAction::List => {
            let reminders = client.fetch_reminders().await?;
            let db = Database::open()?;
            db.cache_reminders(&reminders)?;
            // Viewing the list acknowledges outstanding notifications.
            db.reset_notification_count()?;

            let offset = config.display_offset();
            for reminder in &reminders {
                let local = reminder.sent_time.with_timezone(&offset);
                println!(
                    "{:>6}  {}  {:<10}  {}",
                    reminder.id,
                    local.format("%Y-%m-%d %I:%M %p"),
                    format!("{:?}", reminder.status).to_uppercase(),
                    reminder.medication_label(),
                );
            }
            if reminders.is_empty() {
                println!("no reminders");
            }
        }
        ReminderAction::Take { id } => {
            client.mark_taken(id).await?;
            println!("reminder {id} marked taken");
        }
        ReminderAction::Skip { id } => {
            client.mark_skipped(id).await?;
            println!("reminder {id} marked skipped");
        }
        ReminderAction::Watch {
            no_desktop,
            no_prompt,
        } => {
            let desktop = if config.notifications.enabled && !no_desktop {
                Some(DesktopNotifier::new(config.notifications.timeout_secs))
            } else {
                None
            };
            let presenter =
                ConsolePresenter::new(desktop, !no_prompt, config.display_offset());
            let db = Database::open()?;
            let opts = EngineOptions::from_config(&config);
            let mut engine = ReminderEngine::new(client, db, Box::new(presenter), opts);

            let cancel = CancellationToken::new();
            let stop = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    stop.cancel();
                }
            });

            info!(
                tick_secs = config.poll.tick_interval_secs,
                refetch_secs = config.poll.refetch_interval_secs,
                "watching for due reminders, ctrl-c to stop"
            );
            engine.run(cancel).await?;
            println!("stopped");
        }
    }
    Ok(())
}
