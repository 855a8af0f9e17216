//! End-to-end poll loop test: mock backend, scripted presenter, real
//! engine run with cancellation teardown.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use merohealth_core::api::{ApiClient, MemoryTokenStore};
use merohealth_core::error::NotifyError;
use merohealth_core::notify::{Presenter, ReminderAction};
use merohealth_core::reminder::engine::{EngineOptions, ReminderEngine};
use merohealth_core::reminder::Reminder;
use merohealth_core::storage::Database;
use tokio_util::sync::CancellationToken;

struct RecordingPresenter {
    seen: Arc<Mutex<Vec<i64>>>,
    answer: Option<ReminderAction>,
}

impl Presenter for RecordingPresenter {
    fn present(&self, reminder: &Reminder) -> Result<Option<ReminderAction>, NotifyError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(reminder.id);
        }
        Ok(self.answer)
    }
}

fn fast_options() -> EngineOptions {
    EngineOptions {
        tick_interval: Duration::from_millis(10),
        refetch_interval: Duration::from_secs(3600),
        grace: chrono::Duration::minutes(5),
    }
}

fn due_reminder_body(id: i64) -> String {
    let sent = (Utc::now() - chrono::Duration::minutes(10)).to_rfc3339();
    format!(
        r#"[{{"id": {id}, "sent_time": "{sent}", "status": "PENDING",
             "schedule_details": {{"medication": "Aspirin"}}}}]"#
    )
}

#[tokio::test]
async fn watch_surfaces_a_due_reminder_exactly_once() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/schedules/reminders/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(due_reminder_body(1))
        .create_async()
        .await;

    let store = Arc::new(MemoryTokenStore::with_tokens("acc", "ref"));
    let client = ApiClient::with_base_url(&server.url(), Duration::from_secs(2), store).unwrap();
    let db = Database::open_memory().unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let presenter = RecordingPresenter {
        seen: Arc::clone(&seen),
        answer: None,
    };

    let mut engine = ReminderEngine::new(client, db, Box::new(presenter), fast_options());
    let cancel = CancellationToken::new();
    let stop = cancel.clone();

    let handle = tokio::spawn(async move { engine.run(cancel).await });
    // Plenty of ticks at 10ms; the reminder must surface exactly once.
    tokio::time::sleep(Duration::from_millis(300)).await;
    stop.cancel();
    handle.await.unwrap().unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![1]);
}

#[tokio::test]
async fn take_answer_posts_status_and_forces_refetch() {
    let mut server = mockito::Server::new_async().await;
    let fetch = server
        .mock("GET", "/schedules/reminders/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(due_reminder_body(2))
        .expect_at_least(2) // startup fetch + forced refetch after the response
        .create_async()
        .await;
    let taken = server
        .mock("POST", "/schedules/reminders/2/mark-taken/")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let store = Arc::new(MemoryTokenStore::with_tokens("acc", "ref"));
    let client = ApiClient::with_base_url(&server.url(), Duration::from_secs(2), store).unwrap();
    let db = Database::open_memory().unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let presenter = RecordingPresenter {
        seen: Arc::clone(&seen),
        answer: Some(ReminderAction::Take),
    };

    let mut engine = ReminderEngine::new(client, db, Box::new(presenter), fast_options());
    let cancel = CancellationToken::new();
    let stop = cancel.clone();

    let handle = tokio::spawn(async move { engine.run(cancel).await });
    tokio::time::sleep(Duration::from_millis(300)).await;
    stop.cancel();
    handle.await.unwrap().unwrap();

    fetch.assert_async().await;
    taken.assert_async().await;
    // Refetch returned the stale PENDING copy, but the session shown-set
    // keeps the reminder suppressed.
    assert_eq!(*seen.lock().unwrap(), vec![2]);
}

#[tokio::test]
async fn unreachable_backend_is_not_fatal_to_the_loop() {
    let store = Arc::new(MemoryTokenStore::with_tokens("acc", "ref"));
    let client =
        ApiClient::with_base_url("http://127.0.0.1:9", Duration::from_millis(100), store).unwrap();
    let db = Database::open_memory().unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let presenter = RecordingPresenter {
        seen: Arc::clone(&seen),
        answer: None,
    };

    let mut engine = ReminderEngine::new(client, db, Box::new(presenter), fast_options());
    let cancel = CancellationToken::new();
    let stop = cancel.clone();

    let handle = tokio::spawn(async move { engine.run(cancel).await });
    tokio::time::sleep(Duration::from_millis(200)).await;
    stop.cancel();
    // The loop survives fetch failures and exits cleanly on cancel.
    handle.await.unwrap().unwrap();
    assert!(seen.lock().unwrap().is_empty());
}
