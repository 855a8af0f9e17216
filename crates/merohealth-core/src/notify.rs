//! Reminder presentation.
//!
//! Presentation must reach the user through at least one channel: the
//! desktop notification is best-effort, and a console alert always
//! follows it. The engine owns its presenter -- nothing here is
//! registered globally.

use std::io::{BufRead, Write};

use chrono::FixedOffset;
use notify_rust::{Notification, Timeout};
use tracing::warn;

use crate::error::NotifyError;
use crate::reminder::Reminder;

/// Dedicated notification source name, the equivalent of the mobile
/// client's "medication-reminders" channel.
const APP_NAME: &str = "medication-reminders";

/// What the user chose to do with a surfaced reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderAction {
    Take,
    Skip,
}

/// Seam between the engine and the user. Implementations may block the
/// current tick while waiting for a response; the poll loop resumes once
/// the prompt is answered, like a modal.
pub trait Presenter: Send {
    fn present(&self, reminder: &Reminder) -> Result<Option<ReminderAction>, NotifyError>;
}

/// OS-level notification channel.
pub struct DesktopNotifier {
    timeout_secs: u64,
}

impl DesktopNotifier {
    pub fn new(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }

    /// Fire a desktop notification for a due reminder.
    pub fn notify(&self, reminder: &Reminder) -> Result<(), NotifyError> {
        Notification::new()
            .appname(APP_NAME)
            .summary("Medication Reminder")
            .body(&format!("Time to take {}", reminder.medication_label()))
            .timeout(Timeout::Milliseconds((self.timeout_secs * 1000) as u32))
            .show()?;
        Ok(())
    }
}

/// Console presenter: desktop notification first (best-effort), then a
/// terminal alert, then -- when interactive -- a take/skip prompt bound
/// to the responder.
pub struct ConsolePresenter {
    desktop: Option<DesktopNotifier>,
    interactive: bool,
    display_offset: FixedOffset,
}

impl ConsolePresenter {
    pub fn new(
        desktop: Option<DesktopNotifier>,
        interactive: bool,
        display_offset: FixedOffset,
    ) -> Self {
        Self {
            desktop,
            interactive,
            display_offset,
        }
    }

    fn prompt(&self) -> Result<Option<ReminderAction>, NotifyError> {
        print!("  [t]ake / [s]kip / [enter] dismiss: ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        Ok(match line.trim().to_ascii_lowercase().as_str() {
            "t" | "take" => Some(ReminderAction::Take),
            "s" | "skip" => Some(ReminderAction::Skip),
            _ => None,
        })
    }
}

impl Presenter for ConsolePresenter {
    fn present(&self, reminder: &Reminder) -> Result<Option<ReminderAction>, NotifyError> {
        if let Some(desktop) = &self.desktop {
            if let Err(e) = desktop.notify(reminder) {
                warn!(error = %e, "desktop notification failed, console alert only");
            }
        }

        let local = reminder.sent_time.with_timezone(&self.display_offset);
        println!();
        println!("== Medication Reminder ==");
        println!(
            "  Time to take {} (due {})",
            reminder.medication_label(),
            local.format("%Y-%m-%d %I:%M %p")
        );
        if let Some(details) = &reminder.schedule_details {
            if let Some(dosage) = &details.dosage {
                println!("  Dosage: {dosage}");
            }
            if let Some(frequency) = &details.frequency {
                println!("  Frequency: {frequency}");
            }
        }

        if self.interactive {
            self.prompt()
        } else {
            println!(
                "  Respond with: merohealth reminder take {0}  |  merohealth reminder skip {0}",
                reminder.id
            );
            Ok(None)
        }
    }
}
