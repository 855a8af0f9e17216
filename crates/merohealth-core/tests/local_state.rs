//! Local state persistence across database reopens.

use chrono::Utc;
use merohealth_core::reminder::{Reminder, ReminderStatus};
use merohealth_core::storage::Database;

#[test]
fn notification_counter_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("merohealth.db");

    {
        let db = Database::open_at(&path).unwrap();
        db.increment_notification_count().unwrap();
        db.increment_notification_count().unwrap();
    }

    let db = Database::open_at(&path).unwrap();
    assert_eq!(db.notification_count().unwrap(), 2);
}

#[test]
fn cached_reminders_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("merohealth.db");

    {
        let db = Database::open_at(&path).unwrap();
        db.cache_reminders(&[Reminder {
            id: 12,
            sent_time: Utc::now(),
            status: ReminderStatus::Sent,
            schedule_details: None,
        }])
        .unwrap();
    }

    let db = Database::open_at(&path).unwrap();
    let cached = db.cached_reminders().unwrap().unwrap();
    assert_eq!(cached[0].id, 12);
    assert_eq!(cached[0].status, ReminderStatus::Sent);
}
