//! Reminder data model and due-detection.
//!
//! A [`Reminder`] is one scheduled notification instance for a medication
//! schedule. Records are created server-side; the client only reads them
//! and advances their status.
//!
//! ## Status transitions
//!
//! ```text
//! Pending -> (Sent | Taken | Skipped)
//! ```
//!
//! `Taken` and `Skipped` are terminal.

pub mod detector;
pub mod engine;

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a reminder, as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReminderStatus {
    Pending,
    Sent,
    Taken,
    Skipped,
}

impl ReminderStatus {
    /// Terminal statuses never transition again and are never surfaced.
    pub fn is_terminal(self) -> bool {
        matches!(self, ReminderStatus::Taken | ReminderStatus::Skipped)
    }
}

/// Snapshot of the owning medication schedule, as embedded in reminder
/// responses. All fields are optional on the wire; they are normalized
/// here once, at the fetch boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleDetails {
    #[serde(default)]
    pub medication: Option<String>,
    #[serde(default)]
    pub dosage: Option<String>,
    #[serde(default)]
    pub frequency: Option<String>,
}

/// One scheduled notification instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub id: i64,
    /// UTC instant at which the reminder becomes due.
    pub sent_time: DateTime<Utc>,
    pub status: ReminderStatus,
    #[serde(default)]
    pub schedule_details: Option<ScheduleDetails>,
}

impl Reminder {
    /// Medication name for presentation, with the fallback the UI uses
    /// when the schedule snapshot is missing.
    pub fn medication_label(&self) -> &str {
        self.schedule_details
            .as_ref()
            .and_then(|d| d.medication.as_deref())
            .unwrap_or("your medication")
    }
}

/// Session-scoped set of reminder ids that have already been surfaced.
///
/// Never persisted: restarting the client may legitimately re-surface
/// reminders whose status has not advanced server-side.
#[derive(Debug, Default)]
pub struct DueTracker {
    shown: HashSet<i64>,
}

impl DueTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an id as shown. Must be called before presentation so a
    /// second tick can never pick the same reminder.
    pub fn mark_shown(&mut self, id: i64) -> bool {
        self.shown.insert(id)
    }

    pub fn is_shown(&self, id: i64) -> bool {
        self.shown.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.shown.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }
}
