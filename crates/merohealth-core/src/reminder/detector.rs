//! Due-reminder detection.
//!
//! A pure scan over the in-memory reminder list: the caller owns the
//! clock and the shown-set and invokes [`check_due`] on each timer tick.
//! No I/O happens here; the list being scanned was populated by a prior,
//! separately awaited fetch.

use chrono::{DateTime, Duration, Utc};

use super::{DueTracker, Reminder, ReminderStatus};

/// Decide whether a reminder should be surfaced at `now`.
///
/// A candidate is due when its `sent_time` has passed, it has not been
/// surfaced this session, and it is still `Pending` -- or `Sent` within
/// the trailing `grace` window (the backend may have pushed it while the
/// client was away).
///
/// When several reminders are due at once, the earliest `sent_time` wins,
/// lower id on exact ties. Exactly one reminder is returned per call; the
/// rest stay eligible for later ticks.
pub fn check_due<'a>(
    reminders: &'a [Reminder],
    shown: &DueTracker,
    now: DateTime<Utc>,
    grace: Duration,
) -> Option<&'a Reminder> {
    reminders
        .iter()
        .filter(|r| is_due(r, shown, now, grace))
        .min_by_key(|r| (r.sent_time, r.id))
}

fn is_due(reminder: &Reminder, shown: &DueTracker, now: DateTime<Utc>, grace: Duration) -> bool {
    if reminder.sent_time > now || shown.is_shown(reminder.id) {
        return false;
    }
    match reminder.status {
        ReminderStatus::Pending => true,
        ReminderStatus::Sent => now - reminder.sent_time <= grace,
        ReminderStatus::Taken | ReminderStatus::Skipped => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn reminder(id: i64, offset_min: i64, status: ReminderStatus) -> Reminder {
        Reminder {
            id,
            sent_time: Utc::now() + Duration::minutes(offset_min),
            status,
            schedule_details: None,
        }
    }

    fn grace() -> Duration {
        Duration::minutes(5)
    }

    #[test]
    fn pending_past_reminder_is_due() {
        let reminders = vec![reminder(1, -10, ReminderStatus::Pending)];
        let shown = DueTracker::new();
        let due = check_due(&reminders, &shown, Utc::now(), grace());
        assert_eq!(due.map(|r| r.id), Some(1));
    }

    #[test]
    fn future_reminder_is_not_due() {
        let reminders = vec![reminder(2, 60, ReminderStatus::Pending)];
        let shown = DueTracker::new();
        assert!(check_due(&reminders, &shown, Utc::now(), grace()).is_none());
    }

    #[test]
    fn shown_reminder_is_never_reselected() {
        let reminders = vec![reminder(1, -10, ReminderStatus::Pending)];
        let mut shown = DueTracker::new();
        shown.mark_shown(1);
        for _ in 0..50 {
            assert!(check_due(&reminders, &shown, Utc::now(), grace()).is_none());
        }
    }

    #[test]
    fn terminal_statuses_are_never_due() {
        let reminders = vec![
            reminder(1, -10, ReminderStatus::Taken),
            reminder(2, -10, ReminderStatus::Skipped),
        ];
        let shown = DueTracker::new();
        assert!(check_due(&reminders, &shown, Utc::now(), grace()).is_none());
    }

    #[test]
    fn sent_within_grace_is_due() {
        let reminders = vec![reminder(3, -4, ReminderStatus::Sent)];
        let shown = DueTracker::new();
        assert_eq!(
            check_due(&reminders, &shown, Utc::now(), grace()).map(|r| r.id),
            Some(3)
        );
    }

    #[test]
    fn sent_outside_grace_is_not_due() {
        let reminders = vec![reminder(3, -6, ReminderStatus::Sent)];
        let shown = DueTracker::new();
        assert!(check_due(&reminders, &shown, Utc::now(), grace()).is_none());
    }

    #[test]
    fn simultaneous_reminders_surface_one_per_tick_earliest_first() {
        let reminders = vec![
            reminder(5, -3, ReminderStatus::Pending),
            reminder(4, -8, ReminderStatus::Pending),
        ];
        let mut shown = DueTracker::new();
        let now = Utc::now();

        let first = check_due(&reminders, &shown, now, grace()).map(|r| r.id);
        assert_eq!(first, Some(4));
        shown.mark_shown(4);

        let second = check_due(&reminders, &shown, now, grace()).map(|r| r.id);
        assert_eq!(second, Some(5));
        shown.mark_shown(5);

        assert!(check_due(&reminders, &shown, now, grace()).is_none());
    }

    #[test]
    fn exact_tie_breaks_on_lower_id() {
        let t = Utc::now() - Duration::minutes(2);
        let mut a = reminder(9, 0, ReminderStatus::Pending);
        let mut b = reminder(8, 0, ReminderStatus::Pending);
        a.sent_time = t;
        b.sent_time = t;
        let shown = DueTracker::new();
        let reminders = [a, b];
        let due = check_due(&reminders, &shown, Utc::now(), grace());
        assert_eq!(due.map(|r| r.id), Some(8));
    }

    #[test]
    fn each_id_surfaces_exactly_once_across_session() {
        let reminders: Vec<Reminder> = (0..10)
            .map(|i| reminder(i, -i - 1, ReminderStatus::Pending))
            .collect();
        let mut shown = DueTracker::new();
        let now = Utc::now();

        let mut surfaced = Vec::new();
        // Far more ticks than reminders; every id must appear exactly once.
        for _ in 0..100 {
            if let Some(r) = check_due(&reminders, &shown, now, grace()) {
                shown.mark_shown(r.id);
                surfaced.push(r.id);
            }
        }
        let mut expected: Vec<i64> = (0..10).collect();
        expected.reverse(); // oldest sent_time first
        assert_eq!(surfaced, expected);
    }

    fn arb_status() -> impl Strategy<Value = ReminderStatus> {
        prop_oneof![
            Just(ReminderStatus::Pending),
            Just(ReminderStatus::Sent),
            Just(ReminderStatus::Taken),
            Just(ReminderStatus::Skipped),
        ]
    }

    proptest! {
        #[test]
        fn selected_reminder_always_satisfies_due_predicate(
            offsets in prop::collection::vec((-600i64..600, arb_status()), 0..20),
            shown_mask in prop::collection::vec(any::<bool>(), 0..20),
        ) {
            let now = Utc::now();
            let reminders: Vec<Reminder> = offsets
                .iter()
                .enumerate()
                .map(|(i, (off, status))| Reminder {
                    id: i as i64,
                    sent_time: now + Duration::seconds(*off),
                    status: *status,
                    schedule_details: None,
                })
                .collect();
            let mut shown = DueTracker::new();
            for (i, flag) in shown_mask.iter().enumerate() {
                if *flag {
                    shown.mark_shown(i as i64);
                }
            }

            if let Some(r) = check_due(&reminders, &shown, now, grace()) {
                prop_assert!(r.sent_time <= now);
                prop_assert!(!shown.is_shown(r.id));
                prop_assert!(!r.status.is_terminal());
                if r.status == ReminderStatus::Sent {
                    prop_assert!(now - r.sent_time <= grace());
                }
                // Nothing eligible is strictly earlier.
                for other in &reminders {
                    if is_due(other, &shown, now, grace()) {
                        prop_assert!((r.sent_time, r.id) <= (other.sent_time, other.id));
                    }
                }
            } else {
                for other in &reminders {
                    prop_assert!(!is_due(other, &shown, now, grace()));
                }
            }
        }
    }
}
