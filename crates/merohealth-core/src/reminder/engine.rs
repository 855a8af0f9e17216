//! Reminder polling engine.
//!
//! Single cooperative loop: a short detector tick plus a slower wholesale
//! refetch, both driven from one `tokio::select!`. A failed fetch keeps
//! the last known list in place (seeded from the local cache at startup)
//! and the next interval retries -- a missed tick is never surfaced to
//! the user as an error.
//!
//! Status responses are optimistic: the local copy flips to the terminal
//! status immediately and the backend post is spawned fire-and-forget.
//! Overlapping posts across ticks are an accepted race; reconciliation
//! happens through the refetch that follows.

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::error::Result;
use crate::notify::{Presenter, ReminderAction};
use crate::storage::{Config, Database};

use super::detector::check_due;
use super::{DueTracker, Reminder, ReminderStatus};

/// Timing knobs for the poll loop.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Interval between due-detection ticks.
    pub tick_interval: std::time::Duration,
    /// Interval between wholesale reminder refetches.
    pub refetch_interval: std::time::Duration,
    /// Trailing window during which a SENT reminder may still surface.
    pub grace: chrono::Duration,
}

impl EngineOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            tick_interval: config.tick_interval(),
            refetch_interval: config.refetch_interval(),
            grace: config.grace_window(),
        }
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            tick_interval: std::time::Duration::from_secs(3),
            refetch_interval: std::time::Duration::from_secs(60),
            grace: chrono::Duration::minutes(5),
        }
    }
}

/// Owns the reminder list, the session shown-set, the presenter, and the
/// API client. Construct per watch session; dropping it (after
/// cancellation) tears everything down.
pub struct ReminderEngine {
    client: ApiClient,
    db: Database,
    presenter: Box<dyn Presenter>,
    opts: EngineOptions,
    reminders: Vec<Reminder>,
    shown: DueTracker,
    refetch_soon: bool,
}

impl ReminderEngine {
    pub fn new(
        client: ApiClient,
        db: Database,
        presenter: Box<dyn Presenter>,
        opts: EngineOptions,
    ) -> Self {
        Self {
            client,
            db,
            presenter,
            opts,
            reminders: Vec::new(),
            shown: DueTracker::new(),
            refetch_soon: false,
        }
    }

    /// Current in-memory list (last successful fetch, or the seed).
    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    /// Replace the in-memory list directly. Used by tests and by the
    /// startup cache seed.
    pub fn seed(&mut self, reminders: Vec<Reminder>) {
        self.reminders = reminders;
    }

    /// Refresh the list from the backend. On failure the previous list
    /// stays in place.
    pub async fn refetch(&mut self) {
        match self.client.fetch_reminders().await {
            Ok(list) => {
                debug!(count = list.len(), "reminder list refreshed");
                self.reminders = list;
                if let Err(e) = self.db.cache_reminders(&self.reminders) {
                    warn!(error = %e, "failed to cache reminder list");
                }
            }
            Err(e) => {
                warn!(error = %e, "reminder fetch failed, keeping last known list");
            }
        }
    }

    /// One detector pass. Returns the surfaced reminder id, if any.
    ///
    /// The id goes into the shown-set before presentation, so no later
    /// tick can pick the same reminder this session.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<i64> {
        let due = check_due(&self.reminders, &self.shown, now, self.opts.grace)?.clone();
        self.shown.mark_shown(due.id);

        if let Err(e) = self.db.increment_notification_count() {
            warn!(error = %e, "failed to bump notification counter");
        }
        info!(id = due.id, medication = due.medication_label(), "reminder due");

        match self.presenter.present(&due) {
            Ok(Some(action)) => self.respond(due.id, action),
            Ok(None) => {}
            Err(e) => warn!(id = due.id, error = %e, "presentation failed"),
        }
        Some(due.id)
    }

    /// Optimistic status response: flip the local copy, post in the
    /// background, reconcile via the next refetch. Never rolled back.
    fn respond(&mut self, id: i64, action: ReminderAction) {
        let status = match action {
            ReminderAction::Take => ReminderStatus::Taken,
            ReminderAction::Skip => ReminderStatus::Skipped,
        };
        if let Some(reminder) = self.reminders.iter_mut().find(|r| r.id == id) {
            reminder.status = status;
        }

        let client = self.client.clone();
        tokio::spawn(async move {
            let result = match action {
                ReminderAction::Take => client.mark_taken(id).await,
                ReminderAction::Skip => client.mark_skipped(id).await,
            };
            if let Err(e) = result {
                warn!(id, error = %e, "status update failed, keeping optimistic local state");
            }
        });
        self.refetch_soon = true;
    }

    /// Run the poll loop until `cancel` fires.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<()> {
        if self.reminders.is_empty() {
            if let Ok(Some(cached)) = self.db.cached_reminders() {
                debug!(count = cached.len(), "seeded reminder list from cache");
                self.reminders = cached;
            }
        }
        self.refetch().await;

        let mut tick = tokio::time::interval(self.opts.tick_interval);
        let mut refetch = tokio::time::interval(self.opts.refetch_interval);
        // The first interval tick fires immediately; we just fetched.
        refetch.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = refetch.tick() => self.refetch().await,
                _ = tick.tick() => {
                    if self.refetch_soon {
                        self.refetch_soon = false;
                        self.refetch().await;
                    }
                    self.tick(Utc::now());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryTokenStore;
    use std::sync::{Arc, Mutex};

    /// Presenter that records what it was shown and answers with a
    /// scripted action.
    struct ScriptedPresenter {
        seen: Arc<Mutex<Vec<i64>>>,
        answer: Option<ReminderAction>,
    }

    impl Presenter for ScriptedPresenter {
        fn present(
            &self,
            reminder: &Reminder,
        ) -> Result<Option<ReminderAction>, crate::error::NotifyError> {
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(reminder.id);
            }
            Ok(self.answer)
        }
    }

    fn engine_with(
        answer: Option<ReminderAction>,
    ) -> (ReminderEngine, Arc<Mutex<Vec<i64>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let presenter = ScriptedPresenter {
            seen: Arc::clone(&seen),
            answer,
        };
        // Unroutable backend: every network call fails, which the engine
        // must tolerate.
        let client = ApiClient::with_base_url(
            "http://127.0.0.1:9",
            std::time::Duration::from_millis(100),
            Arc::new(MemoryTokenStore::with_tokens("a", "r")),
        )
        .unwrap();
        let db = Database::open_memory().unwrap();
        let engine = ReminderEngine::new(client, db, Box::new(presenter), EngineOptions::default());
        (engine, seen)
    }

    fn pending(id: i64, minutes_ago: i64) -> Reminder {
        Reminder {
            id,
            sent_time: Utc::now() - chrono::Duration::minutes(minutes_ago),
            status: ReminderStatus::Pending,
            schedule_details: None,
        }
    }

    #[tokio::test]
    async fn due_reminder_surfaces_exactly_once() {
        let (mut engine, seen) = engine_with(None);
        engine.seed(vec![pending(1, 10)]);

        assert_eq!(engine.tick(Utc::now()), Some(1));
        for _ in 0..20 {
            assert_eq!(engine.tick(Utc::now()), None);
        }
        assert_eq!(*seen.lock().unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn take_response_is_optimistic_and_suppresses_reselection() {
        let (mut engine, _seen) = engine_with(Some(ReminderAction::Take));
        engine.seed(vec![pending(1, 10)]);

        assert_eq!(engine.tick(Utc::now()), Some(1));
        assert_eq!(engine.reminders()[0].status, ReminderStatus::Taken);

        // A refetched list with a stale PENDING copy must not resurface
        // the reminder: the shown-set suppresses it for the session.
        engine.seed(vec![pending(1, 10)]);
        assert_eq!(engine.tick(Utc::now()), None);
    }

    #[tokio::test]
    async fn simultaneous_reminders_one_per_tick() {
        let (mut engine, seen) = engine_with(None);
        engine.seed(vec![pending(5, 3), pending(4, 8)]);

        let now = Utc::now();
        assert_eq!(engine.tick(now), Some(4));
        assert_eq!(engine.tick(now), Some(5));
        assert_eq!(engine.tick(now), None);
        assert_eq!(*seen.lock().unwrap(), vec![4, 5]);
    }

    #[tokio::test]
    async fn failed_refetch_keeps_last_known_list() {
        let (mut engine, _seen) = engine_with(None);
        engine.seed(vec![pending(7, 1)]);

        engine.refetch().await; // backend unreachable
        assert_eq!(engine.reminders().len(), 1);
        assert_eq!(engine.tick(Utc::now()), Some(7));
    }

    #[tokio::test]
    async fn surfacing_bumps_notification_counter() {
        let (mut engine, _seen) = engine_with(None);
        engine.seed(vec![pending(1, 10), pending(2, 5)]);

        let now = Utc::now();
        engine.tick(now);
        engine.tick(now);
        assert_eq!(engine.db.notification_count().unwrap(), 2);
    }
}
